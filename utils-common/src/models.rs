use serde::{Deserialize, Serialize};

/// 博客文章 - 列表页展示和筛选所需的全部信息
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// 文章唯一标识符（同一集合内唯一）
    pub id: u32,
    /// 文章标题，唯一保证非空的字段
    pub title: String,
    /// 文章摘要
    #[serde(default)]
    pub excerpt: Option<String>,
    /// 文章分类，每篇文章最多属于一个分类
    #[serde(default)]
    pub category: Option<String>,
    /// 作者
    #[serde(default)]
    pub author: Option<String>,
    /// 发布日期，仅用于展示，不做解析
    #[serde(default)]
    pub date: Option<String>,
    /// 封面图片地址
    #[serde(default)]
    pub image: Option<String>,
}

impl Post {
    /// 创建只有标题的文章
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            excerpt: None,
            category: None,
            author: None,
            date: None,
            image: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// 有效分类 - 空字符串视为没有分类
    pub fn category_label(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// 文章包 - 写入二进制文件的文章集合
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PostBundle {
    /// 文章列表，保持原始顺序
    pub posts: Vec<Post>,
}

/// 查找重复的文章ID，返回第一个重复的ID
pub fn find_duplicate_id(posts: &[Post]) -> Option<u32> {
    let mut seen = std::collections::HashSet::with_capacity(posts.len());
    posts.iter().map(|p| p.id).find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_is_treated_as_absent() {
        let post = Post::new(1, "A").with_category("");
        assert_eq!(post.category_label(), None);

        let post = Post::new(2, "B").with_category("Study");
        assert_eq!(post.category_label(), Some("Study"));
    }

    #[test]
    fn optional_fields_may_be_omitted_in_json() {
        let post: Post = serde_json::from_str(r#"{"id": 7, "title": "Only a title"}"#).unwrap();
        assert_eq!(post, Post::new(7, "Only a title"));

        let post: Post =
            serde_json::from_str(r#"{"id": 8, "title": "T", "category": null, "excerpt": "e"}"#)
                .unwrap();
        assert_eq!(post.category, None);
        assert_eq!(post.excerpt.as_deref(), Some("e"));
    }

    #[test]
    fn duplicate_ids_are_detected() {
        let posts = vec![Post::new(1, "a"), Post::new(2, "b"), Post::new(1, "c")];
        assert_eq!(find_duplicate_id(&posts), Some(1));
        assert_eq!(find_duplicate_id(&posts[..2]), None);
    }
}
