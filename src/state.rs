use std::sync::Arc;

use crate::config::AppConfig;
use crate::docs::DocumentStore;
use crate::llm::Generator;
use crate::router::QueryRouter;
use crate::text;

/// Retrieval and context-building limits used by the query router.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub max_keywords: usize,
    /// Results kept per keyword search
    pub per_keyword_limit: usize,
    /// Documents kept after de-duplication
    pub max_documents: usize,
    /// Content longer than this (in chars) is summarized before it goes into the context
    pub summarize_threshold: usize,
    pub summary_sentences: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_keywords: text::DEFAULT_MAX_KEYWORDS,
            per_keyword_limit: 5,
            max_documents: 5,
            summarize_threshold: 1000,
            summary_sentences: text::DEFAULT_SUMMARY_SENTENCES,
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(DocumentStore::open(&config.data_dir));
        Self { config, store }
    }

    /// Router over this state's store. Built on demand since only `ask` needs a model.
    pub fn router(&self, llm: Arc<dyn Generator>) -> QueryRouter {
        QueryRouter::new(self.store.clone(), llm, RetrievalConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_defaults() {
        let cfg = RetrievalConfig::default();
        assert_eq!(cfg.max_keywords, 10);
        assert_eq!(cfg.per_keyword_limit, 5);
        assert_eq!(cfg.max_documents, 5);
        assert_eq!(cfg.summarize_threshold, 1000);
        assert_eq!(cfg.summary_sentences, 3);
    }

    #[test]
    fn test_state_opens_store_at_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: dir.path().join("documents"),
            ..AppConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(state.store.data_dir(), dir.path().join("documents"));
        assert!(state.store.get(None).is_empty());
    }
}
