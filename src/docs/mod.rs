pub mod ingest;
pub mod seed;
pub mod types;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, error, info, info_span, Span};

use crate::error::Result;
use types::{Cdp, CdpDocs, Document, LoadOutcome, LoadReport};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

const TITLE_WEIGHT: u32 = 3;
const CONTENT_WEIGHT: u32 = 1;

/// Per-CDP document lists held in memory and mirrored to `<data_dir>/<cdp>_docs.json`.
pub struct DocumentStore {
    data_dir: PathBuf,
    docs: RwLock<CdpDocs>,
    last_load: RwLock<LoadReport>,
    span: Span,
}

impl DocumentStore {
    /// Open the store at `data_dir`, creating the directory, and load every CDP file.
    pub fn open(data_dir: &Path) -> Self {
        Self::open_with_span(data_dir, info_span!("document_store"))
    }

    pub fn open_with_span(data_dir: &Path, span: Span) -> Self {
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            span.in_scope(|| error!(dir = %data_dir.display(), "Failed to create data dir: {}", e));
        }
        let store = Self {
            data_dir: data_dir.to_path_buf(),
            docs: RwLock::new(CdpDocs::default()),
            last_load: RwLock::new(LoadReport::default()),
            span,
        };
        store.load();
        store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn data_file(&self, cdp: Cdp) -> PathBuf {
        self.data_dir.join(cdp.file_name())
    }

    /// Outcome of the most recent [`load`](Self::load), including the one done by `open`.
    pub fn last_load(&self) -> LoadReport {
        self.last_load.read().clone()
    }

    /// Reload every CDP from disk. Never fails: unreadable files leave that CDP empty
    /// and are reported as [`LoadOutcome::Failed`].
    pub fn load(&self) -> LoadReport {
        let _enter = self.span.enter();
        let mut loaded = CdpDocs::default();
        let mut outcomes = Vec::with_capacity(Cdp::ALL.len());

        for cdp in Cdp::ALL {
            let path = self.data_file(cdp);
            let outcome = if !path.exists() {
                LoadOutcome::Missing
            } else {
                match read_documents(&path) {
                    Ok(docs) => {
                        info!(cdp = cdp.key(), count = docs.len(), "Loaded documents");
                        let count = docs.len();
                        *loaded.get_mut(cdp) = docs;
                        LoadOutcome::Loaded(count)
                    }
                    Err(e) => {
                        error!(cdp = cdp.key(), path = %path.display(), "Error loading documents: {}", e);
                        LoadOutcome::Failed(e.to_string())
                    }
                }
            };
            outcomes.push((cdp, outcome));
        }

        *self.docs.write() = loaded;
        let report = LoadReport { outcomes };
        *self.last_load.write() = report.clone();
        report
    }

    /// Replace all documents for `cdp` and persist them.
    ///
    /// The in-memory replacement stands even if the write fails.
    pub fn save(&self, cdp: Cdp, documents: Vec<Document>) -> Result<()> {
        let _enter = self.span.enter();
        let count = documents.len();
        let path = self.data_file(cdp);
        let written = write_documents(&path, &documents);
        *self.docs.write().get_mut(cdp) = documents;

        match written {
            Ok(()) => {
                info!(cdp = cdp.key(), count, "Saved documents");
                Ok(())
            }
            Err(e) => {
                error!(cdp = cdp.key(), path = %path.display(), "Error saving documents: {}", e);
                Err(e)
            }
        }
    }

    /// Documents for one CDP, or for all CDPs in fixed order.
    pub fn get(&self, cdp: Option<Cdp>) -> Vec<Document> {
        let docs = self.docs.read();
        match cdp {
            Some(cdp) => docs.get(cdp).to_vec(),
            None => docs.iter_all().cloned().collect(),
        }
    }

    /// Like [`get`](Self::get) but from a free-form name. Unknown names yield nothing.
    pub fn get_named(&self, name: &str) -> Vec<Document> {
        match name.parse::<Cdp>() {
            Ok(cdp) => self.get(Some(cdp)),
            Err(_) => Vec::new(),
        }
    }

    /// Literal, case-insensitive substring search over title and content.
    ///
    /// A title hit is worth 3, a content hit 1. The query is not tokenized.
    pub fn search(&self, query: &str, cdp: Option<Cdp>, limit: usize) -> Vec<Document> {
        let query = query.to_lowercase();
        let docs = self.docs.read();
        let candidates: Box<dyn Iterator<Item = &Document>> = match cdp {
            Some(cdp) => Box::new(docs.get(cdp).iter()),
            None => Box::new(docs.iter_all()),
        };

        let mut results: Vec<(u32, &Document)> = candidates
            .filter_map(|doc| {
                let score = score_document(doc, &query);
                (score > 0).then_some((score, doc))
            })
            .collect();

        // stable: equal scores keep store order
        results.sort_by(|a, b| b.0.cmp(&a.0));
        results.truncate(limit);

        let _enter = self.span.enter();
        debug!(query = %query, hits = results.len(), "search complete");
        results.into_iter().map(|(_, doc)| doc.clone()).collect()
    }

    /// Document count per CDP, in fixed order.
    pub fn counts(&self) -> Vec<(Cdp, usize)> {
        let docs = self.docs.read();
        Cdp::ALL
            .into_iter()
            .map(|cdp| (cdp, docs.get(cdp).len()))
            .collect()
    }
}

/// Score of one document against an already lowercased query.
fn score_document(doc: &Document, query: &str) -> u32 {
    let mut score = 0;
    if doc.title.to_lowercase().contains(query) {
        score += TITLE_WEIGHT;
    }
    if doc.content.to_lowercase().contains(query) {
        score += CONTENT_WEIGHT;
    }
    score
}

fn write_documents(path: &Path, documents: &[Document]) -> Result<()> {
    let json = serde_json::to_string_pretty(documents)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn doc(title: &str, url: &str, content: &str) -> Document {
        Document::new(title, url, content, "Segment")
    }

    fn store_with(docs: Vec<(Cdp, Vec<Document>)>) -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        for (cdp, list) in docs {
            store.save(cdp, list).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_open_empty_dir_has_every_cdp() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        let report = store.load();
        for cdp in Cdp::ALL {
            assert_eq!(report.outcome(cdp), Some(&LoadOutcome::Missing));
            assert!(store.get(Some(cdp)).is_empty());
        }
        assert_eq!(store.counts().len(), 4);
    }

    #[test]
    fn test_open_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("documents");
        let _store = DocumentStore::open(&nested);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let docs = vec![
            doc("Sources", "u1", "How to add a source"),
            Document::new("", "u2", "", ""),
        ];
        let (dir, store) = store_with(vec![(Cdp::Lytics, docs.clone())]);

        let reopened = DocumentStore::open(dir.path());
        assert_eq!(reopened.get(Some(Cdp::Lytics)), docs);
        assert_eq!(
            reopened.load().outcome(Cdp::Lytics),
            Some(&LoadOutcome::Loaded(2))
        );
        assert_eq!(store.get(Some(Cdp::Lytics)), docs);
    }

    #[test]
    fn test_corrupt_file_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("zeotap_docs.json"), "{not json").unwrap();
        std::fs::write(
            dir.path().join("segment_docs.json"),
            r#"[{"title": "t", "url": "u"}]"#,
        )
        .unwrap();

        let store = DocumentStore::open(dir.path());
        let report = store.load();
        assert!(matches!(report.outcome(Cdp::Zeotap), Some(LoadOutcome::Failed(_))));
        assert_eq!(report.failures(), 1);
        assert!(store.get(Some(Cdp::Zeotap)).is_empty());
        assert_eq!(store.get(Some(Cdp::Segment)).len(), 1);
        assert_eq!(store.get(Some(Cdp::Segment))[0].content, "");
    }

    #[test]
    fn test_null_field_keeps_every_record() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("segment_docs.json"),
            r#"[
  {"title": "Sources", "url": "u1", "content": "add a source", "source": null},
  {"title": "Tracking", "url": "u2", "content": "track events", "source": "Segment"}
]"#,
        )
        .unwrap();

        let store = DocumentStore::open(dir.path());
        assert_eq!(
            store.last_load().outcome(Cdp::Segment),
            Some(&LoadOutcome::Loaded(2))
        );
        let docs = store.get(Some(Cdp::Segment));
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source_or_default(), "Unknown");
        assert_eq!(store.search("source", None, 10)[0].url, "u1");
    }

    #[test]
    fn test_last_load_tracks_open_and_reload() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("lytics_docs.json"), "{not json").unwrap();
        let store = DocumentStore::open(dir.path());
        assert_eq!(store.last_load().failures(), 1);

        std::fs::write(dir.path().join("lytics_docs.json"), "[]").unwrap();
        store.load();
        assert_eq!(store.last_load().failures(), 0);
        assert_eq!(
            store.last_load().outcome(Cdp::Lytics),
            Some(&LoadOutcome::Loaded(0))
        );
    }

    #[test]
    fn test_save_replaces_wholesale() {
        let (_dir, store) = store_with(vec![(
            Cdp::Segment,
            vec![doc("a", "u1", ""), doc("b", "u2", "")],
        )]);
        store.save(Cdp::Segment, vec![doc("c", "u3", "")]).unwrap();
        let urls: Vec<String> = store.get(Some(Cdp::Segment)).into_iter().map(|d| d.url).collect();
        assert_eq!(urls, vec!["u3"]);
    }

    #[test]
    fn test_save_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        // a directory where the file should go makes the write fail
        std::fs::create_dir(store.data_file(Cdp::Mparticle)).unwrap();
        let result = store.save(Cdp::Mparticle, vec![doc("a", "u1", "")]);
        assert!(result.is_err());
        assert_eq!(store.get(Some(Cdp::Mparticle)).len(), 1);
    }

    #[test]
    fn test_get_all_in_fixed_order() {
        let (_dir, store) = store_with(vec![
            (Cdp::Zeotap, vec![doc("z", "z1", "")]),
            (Cdp::Segment, vec![doc("s", "s1", "")]),
            (Cdp::Mparticle, vec![doc("m", "m1", "")]),
        ]);
        let urls: Vec<String> = store.get(None).into_iter().map(|d| d.url).collect();
        assert_eq!(urls, vec!["s1", "m1", "z1"]);
    }

    #[test]
    fn test_get_named_unknown_is_empty() {
        let (_dir, store) = store_with(vec![(Cdp::Segment, vec![doc("s", "s1", "")])]);
        assert!(store.get_named("tealium").is_empty());
        assert!(store.get_named("").is_empty());
        assert_eq!(store.get_named("Segment").len(), 1);
    }

    #[test]
    fn test_search_title_match_scores() {
        let (_dir, store) = store_with(vec![(
            Cdp::Segment,
            vec![doc(
                "Setting up a new source in Segment",
                "u1",
                "Open the dashboard and add a source.",
            )],
        )]);
        let results = store.search("segment", None, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "u1");

        let doc = &results[0];
        assert_eq!(score_document(doc, "segment"), 3);
        assert_eq!(score_document(doc, "source"), 4);
    }

    #[test]
    fn test_search_any_title_substring_hits() {
        let title = "Creating Audience Segments";
        let (_dir, store) = store_with(vec![(Cdp::Lytics, vec![doc(title, "u1", "")])]);
        let lower = title.to_lowercase();
        for start in 0..lower.len() {
            for end in start + 1..=lower.len() {
                let query = &title[start..end];
                let hits = store.search(query, None, 10);
                assert_eq!(hits.len(), 1, "query {:?}", query);
                assert!(score_document(&hits[0], &query.to_lowercase()) >= 3);
            }
        }
    }

    #[test]
    fn test_search_orders_by_score_then_store_order() {
        let (_dir, store) = store_with(vec![(
            Cdp::Segment,
            vec![
                doc("Intro", "content-only-1", "about tracking"),
                doc("Tracking plans", "title-only", "nothing here"),
                doc("Other", "content-only-2", "more tracking"),
                doc("Tracking events", "both", "tracking calls"),
            ],
        )]);
        let urls: Vec<String> = store
            .search("Tracking", Some(Cdp::Segment), 10)
            .into_iter()
            .map(|d| d.url)
            .collect();
        assert_eq!(urls, vec!["both", "title-only", "content-only-1", "content-only-2"]);
    }

    #[test]
    fn test_search_multi_word_is_literal() {
        let (_dir, store) = store_with(vec![(
            Cdp::Segment,
            vec![doc("Audience building", "u1", "build an audience")],
        )]);
        assert!(store.search("building audience", None, 10).is_empty());
        assert_eq!(store.search("audience building", None, 10).len(), 1);
    }

    #[test]
    fn test_search_respects_cdp_and_limit() {
        let (_dir, store) = store_with(vec![
            (Cdp::Segment, vec![doc("source a", "s1", ""), doc("source b", "s2", "")]),
            (Cdp::Lytics, vec![doc("source c", "l1", "")]),
        ]);
        assert_eq!(store.search("source", Some(Cdp::Lytics), 10).len(), 1);
        assert_eq!(store.search("source", None, 2).len(), 2);
        assert_eq!(store.search("source", None, 10).len(), 3);
    }
}
