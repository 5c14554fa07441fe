pub mod prompts;
pub mod query;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, info_span, Instrument, Span};

use crate::docs::types::{Cdp, Document};
use crate::docs::DocumentStore;
use crate::error::{Error, Result};
use crate::llm::Generator;
use crate::state::RetrievalConfig;
use crate::text;
use crate::timing::ScopedTimer;

use query::QueryType;

/// Answers questions by retrieving documents from the store and handing them to a
/// [`Generator`] as context.
pub struct QueryRouter {
    store: Arc<DocumentStore>,
    llm: Arc<dyn Generator>,
    config: RetrievalConfig,
    span: Span,
}

impl QueryRouter {
    pub fn new(store: Arc<DocumentStore>, llm: Arc<dyn Generator>, config: RetrievalConfig) -> Self {
        Self::with_span(store, llm, config, info_span!("query_router"))
    }

    pub fn with_span(
        store: Arc<DocumentStore>,
        llm: Arc<dyn Generator>,
        config: RetrievalConfig,
        span: Span,
    ) -> Self {
        span.in_scope(|| info!("Query router initialized"));
        Self {
            store,
            llm,
            config,
            span,
        }
    }

    /// Answer `query`. Never fails: errors come back as an apology message.
    ///
    /// `cdp` is the label shown in the prompt (e.g. "Segment"); it also scopes retrieval
    /// when it names a known CDP.
    pub async fn handle_query(&self, query: &str, cdp: Option<&str>, query_type: QueryType) -> String {
        let _timer = ScopedTimer::start("handle_query");
        match self
            .answer(query, cdp, query_type)
            .instrument(self.span.clone())
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                self.span
                    .in_scope(|| error!(query_type = %query_type, "Error handling query: {}", e));
                apology(&e)
            }
        }
    }

    async fn answer(&self, query: &str, cdp: Option<&str>, query_type: QueryType) -> Result<String> {
        let prompt = prompts::build_prompt(query, cdp, query_type);
        let documents = self.find_relevant_documents(query, cdp);
        info!(
            cdp = cdp.unwrap_or("all"),
            query_type = %query_type,
            documents = documents.len(),
            "Retrieved documents"
        );
        let context = self.build_context(&documents, query);

        let context = (!context.is_empty()).then_some(context.as_str());
        self.llm
            .generate(&prompt, context)
            .await
            .map_err(Error::Generation)
    }

    /// Per-keyword search, concatenated in keyword order, de-duplicated by URL.
    pub fn find_relevant_documents(&self, query: &str, cdp: Option<&str>) -> Vec<Document> {
        let keywords = text::extract_keywords(query, self.config.max_keywords);
        debug!(?keywords, "Extracted keywords");

        let scope = match cdp {
            None => Scope::All,
            Some(name) => match name.parse::<Cdp>() {
                Ok(cdp) => Scope::One(cdp),
                Err(_) => Scope::Unknown,
            },
        };

        let mut all_results = Vec::new();
        for keyword in &keywords {
            let results = match scope {
                Scope::All => self.store.search(keyword, None, self.config.per_keyword_limit),
                Scope::One(cdp) => self
                    .store
                    .search(keyword, Some(cdp), self.config.per_keyword_limit),
                Scope::Unknown => Vec::new(),
            };
            all_results.extend(results);
        }

        dedupe_by_url(all_results, self.config.max_documents)
    }

    /// Context block for the model. Long documents are summarized first.
    ///
    /// With no documents, falls back to a canned overview of the first CDP named in the
    /// query, or to nothing.
    pub fn build_context(&self, documents: &[Document], query: &str) -> String {
        if documents.is_empty() {
            let lower = query.to_lowercase();
            return Cdp::ALL
                .into_iter()
                .find(|cdp| lower.contains(cdp.key()))
                .map(|cdp| prompts::fallback_context(cdp).to_string())
                .unwrap_or_default();
        }

        let mut context = String::from(prompts::CONTEXT_HEADER);
        for (i, doc) in documents.iter().enumerate() {
            let content = if doc.content.chars().count() > self.config.summarize_threshold {
                text::summarize(&doc.content, self.config.summary_sentences)
            } else {
                doc.content.clone()
            };
            context.push_str(&format!(
                "Document {} - {} (Source: {}):\n{}\n\n",
                i + 1,
                doc.title_or_default(),
                doc.source_or_default(),
                content
            ));
        }
        context
    }
}

#[derive(Clone, Copy)]
enum Scope {
    All,
    One(Cdp),
    Unknown,
}

/// Keep the first document per URL, then cap the list.
fn dedupe_by_url(documents: Vec<Document>, limit: usize) -> Vec<Document> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Document> = documents
        .into_iter()
        .filter(|doc| seen.insert(doc.url.clone()))
        .collect();
    unique.truncate(limit);
    unique
}

fn apology(error: &Error) -> String {
    match error {
        Error::Generation(e) => format!(
            "I'm sorry, I couldn't process your request due to an error: {}",
            e
        ),
        other => format!(
            "I'm sorry, I encountered an error while processing your question: {}",
            other
        ),
    }
}
