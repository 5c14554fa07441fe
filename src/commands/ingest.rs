use anyhow::Result;
use tracing::info;

use crate::commands::{parse_cdp, IngestArgs};
use crate::docs::ingest as doc_ingest;
use crate::state::AppState;
use crate::timing::ScopedTimer;

/// Run the ingest command
pub async fn run(state: &AppState, args: IngestArgs) -> Result<()> {
    let cdp = parse_cdp(&args.cdp)?;
    info!(cdp = cdp.key(), urls = args.urls.len(), "Ingestion started");

    let _timer = ScopedTimer::start("ingest");
    let report = doc_ingest::ingest_urls(
        &state.store,
        cdp,
        &args.urls,
        state.config.ingest_concurrency,
    )
    .await?;

    println!(
        "Ingested {} document(s) for {} ({} requested, {} failed, {} duplicate)",
        report.saved, cdp, report.requested, report.failed, report.duplicates
    );
    println!("Saved to {}", state.store.data_file(cdp).display());
    Ok(())
}
