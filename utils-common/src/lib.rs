pub mod compression;
pub mod models;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{to_compressed, from_compressed, to_binary, from_binary, CURRENT_VERSION};
pub use models::{Post, PostBundle, find_duplicate_id};
