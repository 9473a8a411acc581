//! Shared fixtures for the integration tests

use std::path::{Path, PathBuf};
use trawl::config::{ConvertMode, ConverterConfig, DownloaderConfig, UserAgentConfig};
use wiremock::ResponseTemplate;

/// An HTML page with a title and one anchor per link
pub fn html_page(title: &str, links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|link| format!("<a href=\"{}\">{}</a>\n", link, link))
        .collect();
    let body = format!(
        "<html><head><title>{}</title></head><body>\n{}</body></html>",
        title, anchors
    );
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

pub fn downloader_config(dir: &Path, max_depth: u32, pool: usize) -> DownloaderConfig {
    DownloaderConfig {
        enable: true,
        seed_path: dir.join("targets.txt"),
        source_dir: dir.join("source"),
        catalog_path: dir.join("include.txt"),
        max_depth,
        spider_pool_size: pool,
        link_converter: false,
        legacy_title_key: false,
        request_timeout_secs: 5,
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
        },
    }
}

pub fn converter_config(dir: &Path, mode: ConvertMode, pool: usize) -> ConverterConfig {
    ConverterConfig {
        enable: true,
        mode,
        source_dir: dir.join("source"),
        done_dir: dir.join("done"),
        stopwords_path: dir.join("stopwords.txt"),
        resolver_pool_size: pool,
        link_indexer: false,
    }
}

pub fn write_seeds(config: &DownloaderConfig, seeds: &[String]) {
    std::fs::write(&config.seed_path, seeds.join("\n")).unwrap();
}

/// Files directly inside `dir`, sorted by name
pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}

/// Catalog blocks as lists of lines
pub fn catalog_blocks(path: &Path) -> Vec<Vec<String>> {
    std::fs::read_to_string(path)
        .unwrap()
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| block.lines().map(String::from).collect())
        .collect()
}

/// Value of `key=` in a catalog block
pub fn field<'a>(block: &'a [String], key: &str) -> Option<&'a str> {
    let prefix = format!("{}=", key);
    block
        .iter()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}
