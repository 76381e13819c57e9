use std::fs;
use std::path::Path;
use clap::{Command, Arg, ArgAction};
use walkdir::WalkDir;

use post_filter::builder::PostBundleBuilder;
use post_filter::PostFilter;
use utils_common::Post;

mod html;

use html::{extract_post_from_html, PageOutcome};

// 主函数
fn main() {
    let matches = Command::new("博客文章包生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("从渲染后的HTML文章页面生成文章包，供列表页搜索和筛选使用")
        .arg(Arg::new("source")
            .short('s')
            .long("source")
            .value_name("SOURCE_DIR")
            .help("HTML文章目录路径")
            .required(true))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("文章包输出目录路径")
            .required(true))
        .arg(Arg::new("json")
            .short('j')
            .long("json")
            .help("同时输出 posts.json")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .get_matches();

    // 两个参数都是必填项，clap 已经保证存在
    let source_dir = matches.get_one::<String>("source").map(String::as_str).unwrap_or_default();
    let output_dir = matches.get_one::<String>("output").map(String::as_str).unwrap_or_default();
    let write_json = matches.get_flag("json");
    let verbose = matches.get_flag("verbose");

    let source_path = Path::new(source_dir);
    if !source_path.is_dir() {
        eprintln!("错误: 源目录不存在或不是有效目录 '{}'", source_dir);
        std::process::exit(1);
    }

    let output_path = Path::new(output_dir);
    if !output_path.exists() {
        if let Err(e) = fs::create_dir_all(output_path) {
            eprintln!("错误: 无法创建输出目录 '{}': {}", output_dir, e);
            std::process::exit(1);
        }
    }

    println!("开始生成文章包...");
    println!("源目录: {}", source_dir);
    println!("输出目录: {}", output_dir);

    match generate_bundle(source_path, output_path, write_json, verbose) {
        Ok(_) => println!("文章包生成成功！"),
        Err(e) => {
            eprintln!("错误: 文章包生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

// 扫描、构建并写出文章包
fn generate_bundle(
    source_dir: &Path,
    output_dir: &Path,
    write_json: bool,
    verbose: bool,
) -> Result<(), String> {
    let start_time = std::time::Instant::now();

    println!("扫描HTML文件...");
    let (posts, skipped_count) = scan_html_files(source_dir, verbose)?;
    println!("扫描完成。找到 {} 篇文章，跳过 {} 个文件。", posts.len(), skipped_count);

    if posts.is_empty() {
        return Err("没有找到有效文章".to_string());
    }

    if verbose {
        let categories = PostFilter::derive_categories(&posts);
        println!("分类: {}", categories[1..].join(", "));
    }

    let mut builder = PostBundleBuilder::new();
    for post in &posts {
        builder.add_post(post.clone())?;
    }

    let bundle_path = output_dir.join("posts.bin");
    builder.save_bundle(&bundle_path.to_string_lossy())?;

    if write_json {
        let json_path = output_dir.join("posts.json");
        let json = serde_json::to_string_pretty(&posts)
            .map_err(|e| format!("序列化文章列表失败: {}", e))?;
        fs::write(&json_path, json)
            .map_err(|e| format!("无法写入 {}: {}", json_path.display(), e))?;
        println!("JSON 文章列表已写入: {}", json_path.display());
    }

    println!("生成完成！耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(())
}

// 按文件名顺序扫描HTML文件，文章ID从1开始依次分配
fn scan_html_files(dir_path: &Path, verbose: bool) -> Result<(Vec<Post>, usize), String> {
    let mut posts = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(dir_path).sort_by_file_name() {
        let entry = entry.map_err(|e| format!("遍历目录时出错: {}", e))?;

        if !entry.file_type().is_file() || entry.path().extension().map_or(true, |ext| ext != "html") {
            continue;
        }

        let html = match fs::read_to_string(entry.path()) {
            Ok(html) => html,
            Err(e) => {
                eprintln!("无法读取文件 {}: {}", entry.path().display(), e);
                skipped += 1;
                continue;
            }
        };

        let next_id = posts.len() as u32 + 1;
        match extract_post_from_html(&html, next_id) {
            Ok(PageOutcome::Post(post)) => {
                if verbose {
                    println!("处理: {} -> #{} {}", entry.path().display(), post.id, post.title);
                }
                posts.push(post);
            }
            Ok(outcome) => {
                if verbose {
                    println!("跳过: {} ({:?})", entry.path().display(), outcome);
                }
                skipped += 1;
            }
            Err(err) => {
                if verbose {
                    eprintln!("解析文件时出错 {}: {}", entry.path().display(), err);
                }
                skipped += 1;
            }
        }
    }

    Ok((posts, skipped))
}
