use wasm_bindgen::prelude::*;
use js_sys::{Array, Uint32Array};
use web_sys::console;
use utils_common::models::Post;

// 导出模块
pub mod builder;
pub mod filter;
pub mod models;
pub mod source;
pub mod view;

pub use builder::PostBundleBuilder;
pub use filter::PostFilter;
pub use models::{CategorySelection, FilterResult, FilterState, ALL_CATEGORY};
pub use source::{BundlePostSource, PostSource, StaticPostSource};
pub use view::PostListView;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 解析 JSON 文章列表并校验ID唯一
pub fn parse_posts_json(posts_json: &str) -> Result<Vec<Post>, String> {
    let posts: Vec<Post> = serde_json::from_str(posts_json)
        .map_err(|e| format!("解析文章列表失败: {}", e))?;
    source::ensure_unique_ids(&posts)?;
    Ok(posts)
}

/// 解析筛选参数，空字符串视为默认状态
pub fn parse_filter_state(params_json: &str) -> Result<FilterState, String> {
    if params_json.trim().is_empty() {
        return Ok(FilterState::default());
    }
    serde_json::from_str(params_json).map_err(|e| format!("解析参数失败: {}", e))
}

// 记录错误到浏览器控制台并转换为 JS 异常
fn js_error(message: String) -> JsValue {
    console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(format!("序列化{}失败: {}", what, e)))
}

/// 获取分类列表（一次性调用）
#[wasm_bindgen]
pub fn derive_categories_json(posts_json: &str) -> Result<JsValue, JsValue> {
    let posts = parse_posts_json(posts_json).map_err(js_error)?;
    to_js(&PostFilter::derive_categories(&posts), "分类")
}

/// 筛选文章（一次性调用），返回 { categories, posts, total }
#[wasm_bindgen]
pub fn filter_posts_json(posts_json: &str, params_json: &str) -> Result<JsValue, JsValue> {
    let posts = parse_posts_json(posts_json).map_err(js_error)?;
    let state = parse_filter_state(params_json).map_err(js_error)?;
    to_js(&PostFilter::apply(&posts, &state), "结果")
}

/// 文章列表JS接口 - 页面持有的列表状态
#[wasm_bindgen]
pub struct PostListJS {
    view: PostListView,
}

#[wasm_bindgen]
impl PostListJS {
    /// 从 JSON 文章数组创建
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(posts_json: &str) -> Result<PostListJS, JsValue> {
        let posts = parse_posts_json(posts_json).map_err(js_error)?;
        Ok(Self { view: PostListView::new(posts) })
    }

    /// 从压缩的文章包创建
    #[wasm_bindgen(js_name = fromBundle)]
    pub fn from_bundle(bundle_data: &[u8]) -> Result<PostListJS, JsValue> {
        let view = PostListView::from_source(&BundlePostSource::new(bundle_data))
            .map_err(|e| js_error(format!("初始化文章列表失败: {}", e)))?;
        console::log_1(&JsValue::from_str(&format!("已加载 {} 篇文章", view.posts().len())));
        Ok(Self { view })
    }

    /// 使用内置示例文章创建
    pub fn sample() -> Result<PostListJS, JsValue> {
        let view = PostListView::from_source(&StaticPostSource::sample()).map_err(js_error)?;
        Ok(Self { view })
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, query: &str) {
        self.view.set_query(query);
    }

    #[wasm_bindgen(js_name = selectCategory)]
    pub fn select_category(&mut self, category: &str) {
        self.view.select_category(category);
    }

    /// 替换文章集合
    #[wasm_bindgen(js_name = replacePosts)]
    pub fn replace_posts(&mut self, posts_json: &str) -> Result<(), JsValue> {
        let posts = parse_posts_json(posts_json).map_err(js_error)?;
        self.view.replace_posts(posts).map_err(js_error)
    }

    pub fn reset(&mut self) {
        self.view.reset();
    }

    /// 分类列表，第一项总是 "all"
    pub fn categories(&self) -> Array {
        self.view
            .categories()
            .iter()
            .map(|c| JsValue::from_str(c))
            .collect()
    }

    #[wasm_bindgen(js_name = visiblePosts)]
    pub fn visible_posts(&self) -> Result<JsValue, JsValue> {
        let posts: Vec<&Post> = self.view.visible_posts().collect();
        to_js(&posts, "文章")
    }

    #[wasm_bindgen(js_name = visibleIds)]
    pub fn visible_ids(&self) -> Uint32Array {
        Uint32Array::from(self.view.visible_ids().as_slice())
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[wasm_bindgen(js_name = filterState)]
    pub fn filter_state(&self) -> Result<JsValue, JsValue> {
        to_js(self.view.filter_state(), "筛选状态")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posts_from_json() {
        let posts = parse_posts_json(
            r#"[{"id": 1, "title": "Learn English Fast", "category": "Study"},
                {"id": 2, "title": "IELTS Vocabulary", "category": "IELTS"}]"#,
        )
        .unwrap();
        assert_eq!(PostFilter::visible_ids(&posts, "ielts", ALL_CATEGORY), vec![2]);
    }

    #[test]
    fn rejects_bad_post_json() {
        assert!(parse_posts_json("not json").is_err());
        assert!(parse_posts_json(r#"[{"id": 1}]"#).is_err());
        assert_eq!(
            parse_posts_json(r#"[{"id": 1, "title": "a"}, {"id": 1, "title": "b"}]"#).unwrap_err(),
            "duplicate post id: 1"
        );
    }

    #[test]
    fn filter_params_fall_back_to_defaults() {
        assert_eq!(parse_filter_state("").unwrap(), FilterState::default());
        let state = parse_filter_state(r#"{"query": "ielts"}"#).unwrap();
        assert_eq!(state.query, "ielts");
        assert_eq!(state.category, ALL_CATEGORY);
        assert!(parse_filter_state("[1, 2]").is_err());
    }

    #[test]
    fn version_matches_package() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
