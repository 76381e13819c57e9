use serde::{Deserialize, Serialize};
use utils_common::models::Post;

/// 表示“全部分类”的合成标签，总是分类列表的第一项
pub const ALL_CATEGORY: &str = "all";

/// 分类选择 - 合成的“全部”或某个具体分类
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// 不按分类筛选
    #[default]
    All,
    /// 只保留分类完全相同（区分大小写）的文章
    Category(String),
}

impl CategorySelection {
    /// 从分类标签解析，只有 "all" 被视为全部
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORY {
            Self::All
        } else {
            Self::Category(label.to_string())
        }
    }

    /// 返回对应的分类标签
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORY,
            Self::Category(label) => label,
        }
    }

    /// 判断文章分类是否满足当前选择
    pub fn accepts(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => post.category_label() == Some(label.as_str()),
        }
    }
}

impl From<&str> for CategorySelection {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

/// 筛选状态 - 由列表视图持有，JS 端以 JSON 传入
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// 搜索关键词 (可选, 默认为空)
    #[serde(default)]
    pub query: String,
    /// 选中的分类 (可选, 默认为 "all")
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: default_category(),
        }
    }
}

impl FilterState {
    /// 当前分类选择
    pub fn selection(&self) -> CategorySelection {
        CategorySelection::from_label(&self.category)
    }
}

/// 默认分类为全部
fn default_category() -> String {
    ALL_CATEGORY.to_string()
}

/// 筛选结果 - 返回给渲染层的 (分类列表, 可见文章) 组合
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// 可选分类列表，第一项总是 "all"
    pub categories: Vec<String>,
    /// 可见文章，保持原始顺序
    pub posts: Vec<Post>,
    /// 可见文章数量，为 0 时渲染层显示空状态
    pub total: usize,
}
