use utils_common::models::Post;
use crate::filter::{normalize_query, PostFilter};
use crate::models::{CategorySelection, FilterState};
use crate::source::{ensure_unique_ids, PostSource};

/// 文章列表视图状态
///
/// 持有文章集合和筛选状态，每次变化后同步重新计算分类列表和可见文章。
/// 可见文章以下标保存，避免复制文章数据。
#[derive(Debug, Clone)]
pub struct PostListView {
    posts: Vec<Post>,
    state: FilterState,
    categories: Vec<String>,
    visible: Vec<usize>,
}

impl PostListView {
    /// 使用默认筛选状态创建视图
    pub fn new(posts: Vec<Post>) -> Self {
        let categories = PostFilter::derive_categories(&posts);
        let mut view = Self {
            posts,
            state: FilterState::default(),
            categories,
            visible: Vec::new(),
        };
        view.refresh_visible();
        view
    }

    /// 从文章来源加载
    pub fn from_source<S: PostSource + ?Sized>(source: &S) -> Result<Self, String> {
        Ok(Self::new(source.load_posts()?))
    }

    /// 更新搜索关键词
    pub fn set_query(&mut self, query: &str) {
        if self.state.query == query {
            return;
        }
        self.state.query = query.to_string();
        self.refresh_visible();
    }

    /// 选择分类，不在分类列表中的标签会得到空结果
    pub fn select_category(&mut self, category: &str) {
        if self.state.category == category {
            return;
        }
        self.state.category = category.to_string();
        self.refresh_visible();
    }

    /// 替换文章集合；原分类不存在时回到 "all"
    pub fn replace_posts(&mut self, posts: Vec<Post>) -> Result<(), String> {
        ensure_unique_ids(&posts)?;
        self.posts = posts;
        self.categories = PostFilter::derive_categories(&self.posts);
        if !self.categories.iter().any(|c| *c == self.state.category) {
            self.state.category = CategorySelection::All.label().to_string();
        }
        self.refresh_visible();
        Ok(())
    }

    /// 重新进入页面时恢复默认筛选状态
    pub fn reset(&mut self) {
        if self.state == FilterState::default() {
            return;
        }
        self.state = FilterState::default();
        self.refresh_visible();
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 可见文章，按原始顺序
    pub fn visible_posts(&self) -> impl Iterator<Item = &Post> + '_ {
        self.visible.iter().map(move |&i| &self.posts[i])
    }

    pub fn visible_ids(&self) -> Vec<u32> {
        self.visible_posts().map(|post| post.id).collect()
    }

    /// 没有可见文章时渲染层应显示空状态
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    fn refresh_visible(&mut self) {
        let query = normalize_query(&self.state.query);
        let selection = self.state.selection();
        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| PostFilter::matches_normalized(post, &query, &selection))
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticPostSource;

    fn posts() -> Vec<Post> {
        vec![
            Post::new(1, "Learn English Fast").with_category("Study"),
            Post::new(2, "IELTS Vocabulary").with_category("IELTS"),
            Post::new(3, "Study Routine").with_category("Study"),
            Post::new(4, "Welcome"),
        ]
    }

    #[test]
    fn starts_with_default_state_and_everything_visible() {
        let view = PostListView::new(posts());
        assert_eq!(view.filter_state(), &FilterState::default());
        assert_eq!(view.categories(), ["all", "IELTS", "Study"]);
        assert_eq!(view.visible_ids(), vec![1, 2, 3, 4]);
        assert!(!view.is_empty());
    }

    #[test]
    fn query_and_category_combine() {
        let mut view = PostListView::new(posts());
        view.set_query("STUDY");
        assert_eq!(view.visible_ids(), vec![3]);

        view.set_query("");
        view.select_category("Study");
        assert_eq!(view.visible_ids(), vec![1, 3]);

        view.set_query("fast");
        assert_eq!(view.visible_ids(), vec![1]);
    }

    #[test]
    fn matches_stateless_filter() {
        let mut view = PostListView::new(posts());
        view.set_query("e");
        view.select_category("IELTS");
        let expected = PostFilter::visible_ids(view.posts(), "e", "IELTS");
        assert_eq!(view.visible_ids(), expected);
    }

    #[test]
    fn empty_state_when_nothing_matches() {
        let mut view = PostListView::new(posts());
        view.set_query("xyz");
        assert!(view.is_empty());
        assert_eq!(view.visible_posts().count(), 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = PostListView::new(posts());
        view.set_query("ielts");
        view.select_category("IELTS");
        view.reset();
        assert_eq!(view.filter_state().query, "");
        assert_eq!(view.filter_state().category, "all");
        assert_eq!(view.visible_ids().len(), 4);
    }

    #[test]
    fn replacing_posts_drops_vanished_category() {
        let mut view = PostListView::new(posts());
        view.select_category("IELTS");
        view.replace_posts(vec![Post::new(7, "Only study").with_category("Study")])
            .unwrap();
        assert_eq!(view.filter_state().selection(), CategorySelection::All);
        assert_eq!(view.categories(), ["all", "Study"]);
        assert_eq!(view.visible_ids(), vec![7]);
    }

    #[test]
    fn replacing_posts_keeps_surviving_category() {
        let mut view = PostListView::new(posts());
        view.select_category("Study");
        view.replace_posts(vec![
            Post::new(8, "Other").with_category("IELTS"),
            Post::new(9, "Kept").with_category("Study"),
        ])
        .unwrap();
        assert_eq!(view.filter_state().category, "Study");
        assert_eq!(view.visible_ids(), vec![9]);
    }

    #[test]
    fn replacing_with_duplicate_ids_is_rejected() {
        let mut view = PostListView::new(posts());
        let err = view
            .replace_posts(vec![Post::new(1, "a"), Post::new(1, "b")])
            .unwrap_err();
        assert_eq!(err, "duplicate post id: 1");
        assert_eq!(view.posts().len(), 4);
    }

    #[test]
    fn loads_from_source() {
        let view = PostListView::from_source(&StaticPostSource::sample()).unwrap();
        assert_eq!(view.categories()[0], "all");
        assert_eq!(view.visible_posts().count(), view.posts().len());
    }
}
