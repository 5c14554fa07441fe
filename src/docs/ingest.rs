use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use super::types::{Cdp, Document};
use super::DocumentStore;
use crate::text;

const USER_AGENT: &str = concat!("cdp-support-agent/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECS: u64 = 30;
const TEXT_WIDTH: usize = 120;

static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid regex"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// A fetched page before it becomes a [`Document`].
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub body: String,
    pub is_html: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub requested: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub saved: usize,
}

/// Fetch `urls`, turn each page into a document for `cdp`, and replace that CDP's
/// documents with the result.
///
/// Failed fetches are skipped. Duplicate URLs and pages with identical text are dropped,
/// keeping the first.
pub async fn ingest_urls(
    store: &DocumentStore,
    cdp: Cdp,
    urls: &[String],
    concurrency: usize,
) -> Result<IngestReport> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;

    let mut report = IngestReport {
        requested: urls.len(),
        ..Default::default()
    };

    let mut seen_urls = HashSet::new();
    let unique: Vec<String> = urls
        .iter()
        .filter(|u| seen_urls.insert(u.as_str()))
        .cloned()
        .collect();
    report.duplicates += urls.len() - unique.len();

    // buffered() keeps input order
    let fetched: Vec<Result<FetchedPage>> = futures::stream::iter(unique)
        .map(|url| fetch_page(&client, url))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut pages = Vec::with_capacity(fetched.len());
    for result in fetched {
        match result {
            Ok(page) => pages.push(page),
            Err(e) => {
                warn!(cdp = cdp.key(), "Skipping page: {:#}", e);
                report.failed += 1;
            }
        }
    }

    let documents: Vec<Document> = pages.iter().map(|p| page_to_document(p, cdp)).collect();
    let before = documents.len();
    let documents = dedupe_by_content(documents);
    report.duplicates += before - documents.len();
    report.saved = documents.len();

    store
        .save(cdp, documents)
        .with_context(|| format!("Failed to save documents for {}", cdp.key()))?;

    info!(
        cdp = cdp.key(),
        requested = report.requested,
        saved = report.saved,
        failed = report.failed,
        duplicates = report.duplicates,
        "Ingestion complete"
    );
    Ok(report)
}

async fn fetch_page(client: &reqwest::Client, url: String) -> Result<FetchedPage> {
    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad status for {}", url))?;

    let is_html = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("html"))
        .unwrap_or(false);

    let body = resp
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;

    Ok(FetchedPage { url, body, is_html })
}

/// Convert a fetched page into a document. HTML is rendered to plain text.
pub fn page_to_document(page: &FetchedPage, cdp: Cdp) -> Document {
    let (title, raw_text) = if page.is_html {
        let text = html2text::from_read(page.body.as_bytes(), TEXT_WIDTH)
            .unwrap_or_else(|_| page.body.clone());
        (extract_title(&page.body), text)
    } else {
        ("Untitled".to_string(), page.body.clone())
    };

    let content = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
    Document::new(title, page.url.clone(), content, cdp.display_name())
}

/// First `<h1>`, else `<title>`, else "Untitled".
pub fn extract_title(html: &str) -> String {
    [&*H1, &*TITLE]
        .iter()
        .filter_map(|re| re.captures(html))
        .map(|caps| text::clean(&TAG.replace_all(&caps[1], "")))
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Drop documents whose content hashes the same as an earlier one.
pub fn dedupe_by_content(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(blake3::hash(doc.content.as_bytes())))
        .collect()
}
