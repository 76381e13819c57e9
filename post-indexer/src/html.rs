use std::collections::HashMap;
use chrono::DateTime;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use utils_common::Post;

/// 自动摘要的最大字符数
const EXCERPT_CHARS: usize = 160;

/// 提取正文时跳过的标签
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "head", "meta", "link",
    "header", "footer", "nav", "aside",
    "noscript", "iframe", "svg", "button", "form", "template",
];

/// 页面提取结果
#[derive(Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// 识别为文章
    Post(Post),
    /// 不是文章页面（og:type 不是 article）
    NotArticle,
    /// 没有标题
    MissingTitle,
}

// 从HTML文本中提取文章数据
pub fn extract_post_from_html(html: &str, id: u32) -> Result<PageOutcome, String> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| format!("解析HTML时出错: {}", e))?;

    let meta_tags = extract_meta_tags(&dom.document);
    if meta_tags.get("og:type").map(|t| t.trim()) != Some("article") {
        return Ok(PageOutcome::NotArticle);
    }

    let title = extract_title(&dom.document);
    if title.is_empty() {
        return Ok(PageOutcome::MissingTitle);
    }

    let excerpt = meta_value(&meta_tags, &["description", "og:description"])
        .or_else(|| summarize(&extract_content(&dom.document)));

    let post = Post {
        id,
        title,
        excerpt,
        category: meta_value(&meta_tags, &["article:section"]),
        author: meta_value(&meta_tags, &["author", "article:author"]),
        date: meta_value(&meta_tags, &["article:published_time"]).map(|d| display_date(&d)),
        image: meta_value(&meta_tags, &["og:image"]),
    };

    Ok(PageOutcome::Post(post))
}

/// 发布时间转为展示用日期；无法解析时原样保留
pub fn display_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

// 按顺序取第一个非空的元数据值
fn meta_value(meta_tags: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| meta_tags.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

// 正文前 EXCERPT_CHARS 个字符
fn summarize(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }
    let mut summary: String = content.chars().take(EXCERPT_CHARS).collect();
    if content.chars().count() > EXCERPT_CHARS {
        summary.push_str("...");
    }
    Some(summary)
}

// 标题：优先 <title>，其次 <h1>
fn extract_title(document: &Handle) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|tag| find_element(document, tag))
        .map(|element| {
            let mut text = String::new();
            collect_text(&element, &mut text, false);
            collapse_whitespace(&text)
        })
        .find(|title| !title.is_empty())
        .unwrap_or_default()
}

// 正文：article > main > body
fn extract_content(document: &Handle) -> String {
    let root = ["article", "main", "body"]
        .iter()
        .find_map(|tag| find_element(document, tag));

    let mut content = String::new();
    if let Some(root) = root {
        collect_text(&root, &mut content, true);
    }
    collapse_whitespace(&content)
}

// 深度优先查找第一个指定标签
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if name.local.as_ref() == tag {
            return Some(handle.clone());
        }
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

// 收集文本节点；filtered 为 true 时跳过非正文标签
fn collect_text(handle: &Handle, text: &mut String, filtered: bool) {
    match handle.data {
        NodeData::Text { ref contents } => {
            text.push_str(&contents.borrow());
            text.push(' ');
        }
        NodeData::Element { ref name, .. }
            if filtered && NON_CONTENT_TAGS.contains(&name.local.as_ref()) => {}
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text, filtered);
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// 提取 <meta> 标签：name 或 property -> content，先出现的优先
fn extract_meta_tags(handle: &Handle) -> HashMap<String, String> {
    let mut meta_tags = HashMap::new();
    collect_meta_tags(handle, &mut meta_tags);
    meta_tags
}

fn collect_meta_tags(handle: &Handle, meta_tags: &mut HashMap<String, String>) {
    if let NodeData::Element { ref name, ref attrs, .. } = handle.data {
        if name.local.as_ref() == "meta" {
            let attrs = attrs.borrow();
            let attr = |wanted: &str| {
                attrs
                    .iter()
                    .find(|attr| attr.name.local.as_ref() == wanted)
                    .map(|attr| attr.value.to_string())
            };

            if let (Some(key), Some(content)) = (attr("name").or_else(|| attr("property")), attr("content")) {
                meta_tags.entry(key).or_insert(content);
            }
        }
    }

    for child in handle.children.borrow().iter() {
        collect_meta_tags(child, meta_tags);
    }
}
