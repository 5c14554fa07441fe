//! Built-in sample documentation, used to populate an empty store.

use anyhow::{Context, Result};
use tracing::info;

use super::types::{Cdp, Document};
use super::DocumentStore;

fn seed_json(cdp: Cdp) -> &'static str {
    match cdp {
        Cdp::Segment => include_str!("../../data/seed/segment.json"),
        Cdp::Mparticle => include_str!("../../data/seed/mparticle.json"),
        Cdp::Lytics => include_str!("../../data/seed/lytics.json"),
        Cdp::Zeotap => include_str!("../../data/seed/zeotap.json"),
    }
}

/// The sample documents shipped for `cdp`.
pub fn seed_documents(cdp: Cdp) -> Result<Vec<Document>> {
    serde_json::from_str(seed_json(cdp))
        .with_context(|| format!("Invalid seed data for {}", cdp.key()))
}

/// Replace each CDP's documents with its seed set. Returns (cdp, count) per CDP written.
pub fn seed(store: &DocumentStore, cdps: &[Cdp]) -> Result<Vec<(Cdp, usize)>> {
    let mut written = Vec::with_capacity(cdps.len());
    for &cdp in cdps {
        let docs = seed_documents(cdp)?;
        let count = docs.len();
        store
            .save(cdp, docs)
            .with_context(|| format!("Failed to save seed documents for {}", cdp.key()))?;
        info!(cdp = cdp.key(), count, "Seeded documents");
        written.push((cdp, count));
    }
    Ok(written)
}
