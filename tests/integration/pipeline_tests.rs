//! Downloader -> Converter -> Indexer runs

use crate::common::{
    catalog_blocks, converter_config, downloader_config, field, files_in, html_page, write_seeds,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use trawl::config::{parse_config, ConvertMode};
use trawl::{Converter, Downloader, Engine, Indexer, TokenDocument};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingIndexer {
    documents: Mutex<Vec<TokenDocument>>,
    stop_calls: AtomicUsize,
}

impl Indexer for RecordingIndexer {
    fn index(&self, document: TokenDocument) {
        assert_eq!(
            self.stop_calls.load(Ordering::SeqCst),
            0,
            "document indexed after stop"
        );
        self.documents.lock().unwrap().push(document);
    }

    fn prepare_stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Home</title></head>\n<body>\n\
                 <p>the search engine</p>\n\
                 <a href=\"/about\">about</a>\n<a href=\"/gone\">gone</a>\n\
                 </body></html>",
                "text/html",
            ),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("About the crawler", &["/"]))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reactive_pipeline_converts_every_fetched_page() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("stopwords.txt"), "the\n").unwrap();

    let mut downloader_config = downloader_config(tmp.path(), 3, 2);
    downloader_config.link_converter = true;
    write_seeds(&downloader_config, &[format!("{}/", server.uri())]);

    let mut converter_config = converter_config(tmp.path(), ConvertMode::Reactive, 2);
    converter_config.link_indexer = true;

    let indexer = Arc::new(RecordingIndexer::default());
    let handle = Converter::new(converter_config.clone(), Some(indexer.clone() as Arc<dyn Indexer>))
        .unwrap()
        .start();

    let report = Downloader::new(downloader_config.clone(), Some(handle))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.failed, 1);

    let conversion = report.conversion.expect("converter report missing");
    assert_eq!(conversion.submitted, 2);
    assert_eq!(conversion.converted, 2);
    assert!(conversion.peak_resolvers <= 2);

    // raw files, token files, catalog ids and indexed ids all agree
    let names = |dir: &std::path::Path| -> BTreeSet<String> {
        files_in(dir)
            .iter()
            .map(|p| p.file_stem().unwrap().to_string_lossy().into_owned())
            .collect()
    };
    let raw_ids = names(&downloader_config.source_dir);
    assert_eq!(raw_ids.len(), 2);
    assert_eq!(names(&converter_config.done_dir), raw_ids);

    let catalog_ids: BTreeSet<String> = catalog_blocks(&downloader_config.catalog_path)
        .iter()
        .filter_map(|block| field(block, "hash").map(String::from))
        .collect();
    assert_eq!(catalog_ids, raw_ids);

    let documents = indexer.documents.lock().unwrap();
    let indexed_ids: BTreeSet<String> = documents.iter().map(|d| d.id.clone()).collect();
    assert_eq!(indexed_ids, raw_ids);
    assert!(documents
        .iter()
        .all(|d| !d.tokens.iter().any(|token| token == "the")));
    assert!(documents
        .iter()
        .any(|d| d.tokens == vec!["Home", "search", "engine", "about", "gone"]));

    assert_eq!(indexer.stop_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_engine_wires_components_from_config() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().display().to_string();
    std::fs::write(tmp.path().join("stopwords.txt"), "the\n").unwrap();
    std::fs::write(tmp.path().join("targets.txt"), format!("{}/\n", server.uri())).unwrap();

    let config = parse_config(&format!(
        r#"
        [downloader]
        seed-path = "{dir}/targets.txt"
        source-dir = "{dir}/source"
        catalog-path = "{dir}/include.txt"
        max-depth = 2
        spider-pool-size = 2
        link-converter = true

        [downloader.user-agent]
        crawler-name = "TestBot"
        crawler-version = "1.0.0"

        [converter]
        mode = "reactive"
        source-dir = "{dir}/source"
        done-dir = "{dir}/done"
        stopwords-path = "{dir}/stopwords.txt"
        resolver-pool-size = 2
        link-indexer = true

        [indexer]
        "#
    ))
    .unwrap();

    let report = Engine::new(config).unwrap().run().await.unwrap();

    let crawl = report.crawl.expect("crawl report missing");
    assert_eq!(crawl.fetched, 2);
    assert_eq!(report.conversion.map(|c| c.converted), Some(2));
    assert_eq!(files_in(&tmp.path().join("done")).len(), 2);
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_catalog_failure_still_stops_converter() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("stopwords.txt"), "the\n").unwrap();

    let mut downloader_config = downloader_config(tmp.path(), 2, 2);
    downloader_config.link_converter = true;
    downloader_config.catalog_path = "/dev/full".into();
    write_seeds(&downloader_config, &[format!("{}/", server.uri())]);

    let mut converter_config = converter_config(tmp.path(), ConvertMode::Reactive, 2);
    converter_config.link_indexer = true;

    let indexer = Arc::new(RecordingIndexer::default());
    let handle = Converter::new(converter_config.clone(), Some(indexer.clone() as Arc<dyn Indexer>))
        .unwrap()
        .start();

    let report = Downloader::new(downloader_config, Some(handle))
        .unwrap()
        .run()
        .await
        .expect("catalog failure must not fail the run");

    assert_eq!(report.fetched, 2);
    assert_eq!(report.records_written, 0);
    assert_eq!(report.records_dropped, 2);
    assert!(report.catalog_error.is_some());

    let conversion = report.conversion.expect("converter report missing");
    assert_eq!(conversion.converted, 2);
    assert_eq!(files_in(&converter_config.done_dir).len(), 2);
    assert_eq!(indexer.stop_calls.load(Ordering::SeqCst), 1);
}
