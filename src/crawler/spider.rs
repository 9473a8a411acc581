//! Spider: fetches exactly one URL and reports exactly one outcome
//!
//! A spider never retries. On success it writes the page body to the raw
//! store (the only side effect) and assembles a [`DocumentRecord`]; on any
//! failure nothing is written.

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_html;
use crate::storage::{document_id, DocumentRecord, RawStore, NONE_SENTINEL};
use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors local to a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },

    #[error("{url} is not a document (Content-Type: {content_type})")]
    NotDocument { url: String, content_type: String },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Failed to store {url}: {source}")]
    Persist { url: String, source: std::io::Error },
}

/// The single outcome a spider reports to the downloader
#[derive(Debug)]
pub enum SpiderOutcome {
    Fetched {
        record: DocumentRecord,
        /// Path of the raw file written for this fetch
        raw_path: PathBuf,
        depth: u32,
    },
    Failed {
        url: String,
        depth: u32,
        error: FetchError,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (reqwest's default limit of 10 hops) and outbound
/// links are later resolved against the final URL.
///
/// # Example
///
/// ```no_run
/// use trawl::config::UserAgentConfig;
/// use trawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A successfully downloaded HTML page
#[derive(Debug)]
struct FetchedPage {
    final_url: reqwest::Url,
    body: String,
}

/// Fetches one URL and returns its body if it is an HTML document
async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    // A missing Content-Type is given the benefit of the doubt
    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.to_ascii_lowercase().contains("html") {
            return Err(FetchError::NotDocument {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedPage { final_url, body })
}

/// Fetches `url`, persists the raw body, and builds its document record
///
/// The record keeps the URL as dispatched, so the catalog and the visited set
/// agree on identity even when the server redirected.
pub async fn run_spider(client: Client, store: RawStore, url: String, depth: u32) -> SpiderOutcome {
    match crawl_one(&client, &store, &url).await {
        Ok((record, raw_path)) => SpiderOutcome::Fetched {
            record,
            raw_path,
            depth,
        },
        Err(error) => SpiderOutcome::Failed { url, depth, error },
    }
}

async fn crawl_one(
    client: &Client,
    store: &RawStore,
    url: &str,
) -> Result<(DocumentRecord, PathBuf), FetchError> {
    let page = fetch_page(client, url).await?;
    let parsed = parse_html(&page.body, &page.final_url);

    let fetched_at = Local::now();
    let id = document_id(&fetched_at, url);
    let raw_path = store
        .write(&id, &page.body)
        .await
        .map_err(|source| FetchError::Persist {
            url: url.to_string(),
            source,
        })?;

    let or_none = |value: Option<String>| value.unwrap_or_else(|| NONE_SENTINEL.to_string());
    let record = DocumentRecord {
        id,
        fetched_at,
        url: url.to_string(),
        title: or_none(parsed.title),
        keywords: or_none(parsed.keywords),
        description: or_none(parsed.description),
        links: parsed.links,
    };

    Ok((record, raw_path))
}
