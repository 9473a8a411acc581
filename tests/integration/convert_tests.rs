//! Batch conversion over a source directory

use crate::common::{converter_config, files_in};
use std::path::Path;
use trawl::config::{ConvertMode, ConverterConfig};
use trawl::{ConfigError, ConversionReport, Converter, TrawlError};

fn prepare(dir: &Path, stopwords: &str, documents: &[(&str, &str)]) -> ConverterConfig {
    let source = dir.join("source");
    std::fs::create_dir_all(&source).unwrap();
    for (name, content) in documents {
        std::fs::write(source.join(name), content).unwrap();
    }
    std::fs::write(dir.join("stopwords.txt"), stopwords).unwrap();
    converter_config(dir, ConvertMode::Batch, 2)
}

async fn convert(config: ConverterConfig) -> ConversionReport {
    Converter::new(config, None)
        .expect("Failed to create converter")
        .start()
        .prepare_stop()
        .await
        .expect("Conversion failed")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_batch_converts_every_document_within_pool_bound() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prepare(
        tmp.path(),
        "the\na\n",
        &[
            ("one.txt", "<p>the quick fox</p>"),
            ("two.txt", "<h1>a lazy dog</h1>"),
            ("three.txt", "<div>jumps over the</div>"),
        ],
    );

    let report = convert(config.clone()).await;

    assert_eq!(report.submitted, 3);
    assert_eq!(report.converted, 3);
    assert_eq!(report.missing + report.failed, 0);
    assert!(report.peak_resolvers >= 1 && report.peak_resolvers <= 2);

    let done = &config.done_dir;
    assert_eq!(files_in(done).len(), 3);
    assert_eq!(std::fs::read_to_string(done.join("one.txt")).unwrap(), "quick fox ");
    assert_eq!(std::fs::read_to_string(done.join("two.txt")).unwrap(), "lazy dog ");
    assert_eq!(std::fs::read_to_string(done.join("three.txt")).unwrap(), "jumps over ");
}

#[tokio::test]
async fn test_rerun_overwrites_outputs() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prepare(tmp.path(), "", &[("doc.txt", "alpha beta")]);

    convert(config.clone()).await;
    let first = std::fs::read_to_string(config.done_dir.join("doc.txt")).unwrap();
    convert(config.clone()).await;
    let second = std::fs::read_to_string(config.done_dir.join("doc.txt")).unwrap();

    assert_eq!(first, "alpha beta ");
    assert_eq!(first, second);
    assert_eq!(files_in(&config.done_dir).len(), 1);
}

#[tokio::test]
async fn test_all_stopword_document_still_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prepare(
        tmp.path(),
        "the\nand\n",
        &[
            ("empty.txt", "<script>var x;</script><p>the and</p>"),
            ("case.txt", "<p>the and THE</p>"),
        ],
    );

    let report = convert(config.clone()).await;

    assert_eq!(report.converted, 2);
    assert_eq!(
        std::fs::read_to_string(config.done_dir.join("empty.txt")).unwrap(),
        ""
    );
    // matching is exact, so "THE" survives
    assert_eq!(
        std::fs::read_to_string(config.done_dir.join("case.txt")).unwrap(),
        "THE "
    );
}

#[tokio::test]
async fn test_unsegmented_text_is_split_and_filtered() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prepare(
        tmp.path(),
        "来到\n",
        &[("zh.txt", "<p>我来到北京清华大学</p>")],
    );

    convert(config.clone()).await;

    assert_eq!(
        std::fs::read_to_string(config.done_dir.join("zh.txt")).unwrap(),
        "我 北京 清华大学 "
    );
}

#[tokio::test]
async fn test_empty_source_directory_finishes() {
    let tmp = tempfile::tempdir().unwrap();
    let config = prepare(tmp.path(), "", &[]);

    let report = convert(config.clone()).await;

    assert_eq!(report, ConversionReport::default());
    assert!(config.done_dir.is_dir());
}

#[test]
fn test_missing_stopwords_is_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = converter_config(tmp.path(), ConvertMode::Batch, 2);
    std::fs::create_dir_all(&config.source_dir).unwrap();

    assert!(matches!(
        Converter::new(config, None),
        Err(TrawlError::Config(ConfigError::MissingStopwords(_)))
    ));
}

#[test]
fn test_missing_source_dir_is_config_error_in_batch_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let config = converter_config(tmp.path(), ConvertMode::Batch, 2);
    std::fs::write(&config.stopwords_path, "the\n").unwrap();

    assert!(matches!(
        Converter::new(config, None),
        Err(TrawlError::Config(ConfigError::MissingSourceDir(_)))
    ));
}
