use utils_common::models::{Post, PostBundle};
use utils_common::compression::{to_compressed, CURRENT_VERSION};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;

/// 文章包构建器
#[derive(Debug, Default)]
pub struct PostBundleBuilder {
    posts: Vec<Post>,
    ids: HashSet<u32>,
}

impl PostBundleBuilder {
    /// 创建新的文章包构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文章，ID重复时拒绝
    pub fn add_post(&mut self, post: Post) -> Result<(), String> {
        if !self.ids.insert(post.id) {
            return Err(format!("duplicate post id: {}", post.id));
        }
        self.posts.push(post);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// 构建文章包
    pub fn build_bundle(&self) -> Result<PostBundle, String> {
        if self.posts.is_empty() {
            return Err("无法构建文章包: 没有文章数据".to_string());
        }

        let categories: HashSet<&str> = self.posts.iter().filter_map(Post::category_label).collect();
        println!("文章包构建完成，文章数量: {}, 分类数量: {}", self.posts.len(), categories.len());

        Ok(PostBundle {
            posts: self.posts.clone(),
        })
    }

    /// 编码为压缩的二进制数据
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        let bundle = self.build_bundle()?;
        to_compressed(&bundle, CURRENT_VERSION).map_err(|e| format!("压缩文章包失败: {}", e))
    }

    /// 保存文章包到文件
    pub fn save_bundle(&self, path: &str) -> Result<(), String> {
        println!("开始保存文章包到文件: {}", path);

        let compressed_data = self.to_bytes()?;
        let mut file = File::create(path).map_err(|e| format!("无法创建文章包文件: {}", e))?;
        file.write_all(&compressed_data)
            .map_err(|e| format!("无法写入文章包文件: {}", e))?;

        println!("文章包已成功写入文件: {}，大小: {} 字节", path, compressed_data.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BundlePostSource, PostSource};

    #[test]
    fn empty_builder_cannot_build() {
        assert!(PostBundleBuilder::new().build_bundle().is_err());
        assert!(PostBundleBuilder::new().to_bytes().is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut builder = PostBundleBuilder::new();
        builder.add_post(Post::new(1, "a")).unwrap();
        assert!(builder.add_post(Post::new(1, "b")).is_err());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn bytes_load_back_through_bundle_source() {
        let mut builder = PostBundleBuilder::new();
        builder.add_post(Post::new(2, "Second").with_category("News")).unwrap();
        builder.add_post(Post::new(1, "First")).unwrap();

        let posts = BundlePostSource::new(builder.to_bytes().unwrap())
            .load_posts()
            .unwrap();
        let ids: Vec<u32> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
