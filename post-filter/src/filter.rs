use std::collections::BTreeSet;
use utils_common::models::Post;
use crate::models::{CategorySelection, FilterResult, FilterState, ALL_CATEGORY};

/// 文章过滤器 - 列表页的搜索和分类筛选逻辑
///
/// 所有操作都是纯函数：不修改输入，相同输入总是得到相同输出。
pub struct PostFilter;

impl PostFilter {
    /// 获取可选分类列表
    ///
    /// 第一项总是 "all"，其余为去重后按字典序升序排列的非空分类。
    /// 结果与文章顺序无关。
    pub fn derive_categories(posts: &[Post]) -> Vec<String> {
        let distinct: BTreeSet<&str> = posts
            .iter()
            .filter_map(Post::category_label)
            .filter(|label| *label != ALL_CATEGORY)
            .collect();

        std::iter::once(ALL_CATEGORY)
            .chain(distinct)
            .map(str::to_string)
            .collect()
    }

    /// 筛选文章，保持原始顺序
    pub fn filter_posts<'a>(posts: &'a [Post], query: &str, category: &str) -> Vec<&'a Post> {
        Self::filter_by_selection(posts, query, &CategorySelection::from(category))
    }

    /// 按已解析的分类选择筛选文章
    pub fn filter_by_selection<'a>(
        posts: &'a [Post],
        query: &str,
        selection: &CategorySelection,
    ) -> Vec<&'a Post> {
        let query = normalize_query(query);

        posts
            .iter()
            .filter(|post| Self::matches_normalized(post, &query, selection))
            .collect()
    }

    /// 可见文章的ID列表，顺序与输入一致
    pub fn visible_ids(posts: &[Post], query: &str, category: &str) -> Vec<u32> {
        Self::filter_posts(posts, query, category)
            .into_iter()
            .map(|post| post.id)
            .collect()
    }

    /// 按筛选状态一次性计算分类列表和可见文章
    pub fn apply(posts: &[Post], state: &FilterState) -> FilterResult {
        let visible: Vec<Post> = Self::filter_by_selection(posts, &state.query, &state.selection())
            .into_iter()
            .cloned()
            .collect();

        FilterResult {
            categories: Self::derive_categories(posts),
            total: visible.len(),
            posts: visible,
        }
    }

    /// 单篇文章是否同时满足关键词和分类条件
    pub fn matches(post: &Post, query: &str, selection: &CategorySelection) -> bool {
        Self::matches_normalized(post, &normalize_query(query), selection)
    }

    // 关键词已经转为小写
    pub(crate) fn matches_normalized(post: &Post, query: &str, selection: &CategorySelection) -> bool {
        text_matches(post, query) && selection.accepts(post)
    }
}

/// 关键词统一转为小写，空关键词匹配所有文章
pub(crate) fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

// 标题或摘要包含关键词（不区分大小写）
fn text_matches(post: &Post, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    if post.title.to_lowercase().contains(query) {
        return true;
    }

    post.excerpt
        .as_deref()
        .map_or(false, |excerpt| excerpt.to_lowercase().contains(query))
}
