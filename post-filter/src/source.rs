use once_cell::sync::Lazy;
use utils_common::compression::from_compressed;
use utils_common::models::{find_duplicate_id, Post, PostBundle};

/// 文章来源 - 提供一个已经完整加载的文章集合
pub trait PostSource {
    /// 加载全部文章，保证ID唯一
    fn load_posts(&self) -> Result<Vec<Post>, String>;
}

/// 校验ID唯一性
pub fn ensure_unique_ids(posts: &[Post]) -> Result<(), String> {
    match find_duplicate_id(posts) {
        Some(id) => Err(format!("duplicate post id: {}", id)),
        None => Ok(()),
    }
}

/// 内置示例文章，首次访问时构建
static SAMPLE_POSTS: Lazy<Vec<Post>> = Lazy::new(|| {
    vec![
        Post::new(1, "Learn English Fast")
            .with_excerpt("Ten habits that speed up your daily English practice.")
            .with_category("Study")
            .with_author("Linh Tran")
            .with_date("March 2, 2024")
            .with_image("/images/blog/learn-fast.jpg"),
        Post::new(2, "IELTS Vocabulary")
            .with_excerpt("The topic words that show up again and again in the speaking test.")
            .with_category("IELTS")
            .with_author("Minh Pham")
            .with_date("March 9, 2024")
            .with_image("/images/blog/ielts-vocabulary.jpg"),
        Post::new(3, "How to Build a Study Routine")
            .with_excerpt("Short sessions beat long ones. Plan a week you can actually keep.")
            .with_category("Study")
            .with_author("Linh Tran")
            .with_date("March 16, 2024")
            .with_image("/images/blog/study-routine.jpg"),
        Post::new(4, "IELTS Writing Task 2 Checklist")
            .with_excerpt("Structure, linking words and timing for a band 7 essay.")
            .with_category("IELTS")
            .with_author("Minh Pham")
            .with_date("March 23, 2024")
            .with_image("/images/blog/writing-task-2.jpg"),
        Post::new(5, "Speaking With Confidence")
            .with_excerpt("Simple drills to stop translating in your head.")
            .with_category("Speaking")
            .with_author("Hoa Nguyen")
            .with_date("March 30, 2024")
            .with_image("/images/blog/speaking.jpg"),
        Post::new(6, "Welcome to Our Blog")
            .with_author("Editorial Team")
            .with_date("February 24, 2024"),
    ]
});

/// 静态文章来源 - 内存中的固定列表
#[derive(Debug, Clone, Default)]
pub struct StaticPostSource {
    posts: Vec<Post>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// 内置示例文章
    pub fn sample() -> Self {
        Self::new(SAMPLE_POSTS.clone())
    }
}

impl PostSource for StaticPostSource {
    fn load_posts(&self) -> Result<Vec<Post>, String> {
        ensure_unique_ids(&self.posts)?;
        Ok(self.posts.clone())
    }
}

/// 文章包来源 - 从压缩的二进制数据中读取文章
#[derive(Debug, Clone)]
pub struct BundlePostSource {
    data: Vec<u8>,
}

impl BundlePostSource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl PostSource for BundlePostSource {
    fn load_posts(&self) -> Result<Vec<Post>, String> {
        let bundle: PostBundle = from_compressed(&self.data)
            .map_err(|e| format!("解析文章包失败: {}", e))?;
        ensure_unique_ids(&bundle.posts)?;
        Ok(bundle.posts)
    }
}
