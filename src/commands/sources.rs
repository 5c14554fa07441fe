use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::commands::{parse_cdp, SourcesArgs};
use crate::docs::types::{Cdp, Document, LoadOutcome};
use crate::state::AppState;

/// List stored documents per CDP, or the titles stored for one CDP
pub fn run(state: &AppState, args: SourcesArgs) -> Result<()> {
    let store = &state.store;

    if let Some(name) = args.cdp.as_deref() {
        let cdp = parse_cdp(name)?;
        print!("{}", format_titles(cdp, &store.get_named(name)));
        return Ok(());
    }

    let report = store.last_load();
    let rows: Vec<SourceRow> = store
        .counts()
        .into_iter()
        .map(|(cdp, count)| SourceRow {
            cdp,
            count,
            outcome: report.outcome(cdp).cloned(),
            modified: modified_at(&store.data_file(cdp)),
        })
        .collect();

    println!("Documents in {}\n", store.data_dir().display());
    print!("{}", format_rows(&rows));

    if report.failures() > 0 {
        println!("\nSome files could not be read. Fix or re-seed them with `cdp-agent seed <cdp>`.");
    } else if rows.iter().all(|r| r.count == 0) {
        println!("\nNo documents stored yet. Use `cdp-agent seed` or `cdp-agent ingest` to add some.");
    }
    Ok(())
}

struct SourceRow {
    cdp: Cdp,
    count: usize,
    outcome: Option<LoadOutcome>,
    modified: Option<DateTime<Local>>,
}

fn modified_at(path: &Path) -> Option<DateTime<Local>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

fn format_rows(rows: &[SourceRow]) -> String {
    let mut output = String::new();
    for row in rows {
        let status = match &row.outcome {
            Some(LoadOutcome::Failed(reason)) => format!("failed to load: {}", reason),
            _ => match row.modified {
                Some(t) => format!("updated {}", t.format("%Y-%m-%d %H:%M")),
                None => "updated never".to_string(),
            },
        };
        output.push_str(&format!(
            "  {:<10} {:>4} docs  ({})\n",
            row.cdp.display_name(),
            row.count,
            status
        ));
    }
    output
}

fn format_titles(cdp: Cdp, documents: &[Document]) -> String {
    if documents.is_empty() {
        return format!("No documents stored for {}.\n", cdp);
    }
    let mut output = format!("{} ({} docs)\n", cdp, documents.len());
    for doc in documents {
        output.push_str(&format!("  - {}\n    {}\n", doc.title_or_default(), doc.url));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_rows() {
        let rows = vec![
            SourceRow {
                cdp: Cdp::Segment,
                count: 4,
                outcome: Some(LoadOutcome::Loaded(4)),
                modified: Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single(),
            },
            SourceRow {
                cdp: Cdp::Zeotap,
                count: 0,
                outcome: Some(LoadOutcome::Missing),
                modified: None,
            },
        ];
        assert_eq!(
            format_rows(&rows),
            "  Segment       4 docs  (updated 2024-03-01 09:30)\n  Zeotap        0 docs  (updated never)\n"
        );
    }

    #[test]
    fn test_failed_file_is_not_shown_as_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("mparticle_docs.json"), "{not json").unwrap();
        let state = AppState::new(crate::config::AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        });

        let report = state.store.last_load();
        let rows = vec![SourceRow {
            cdp: Cdp::Mparticle,
            count: 0,
            outcome: report.outcome(Cdp::Mparticle).cloned(),
            modified: None,
        }];
        let out = format_rows(&rows);
        assert!(out.starts_with("  mParticle     0 docs  (failed to load: JSON error:"));
        assert!(!out.contains("updated"));
    }

    #[test]
    fn test_format_titles() {
        let docs = vec![
            Document::new("Sources", "https://a", "", "Segment"),
            Document::new("", "https://b", "", "Segment"),
        ];
        assert_eq!(
            format_titles(Cdp::Segment, &docs),
            "Segment (2 docs)\n  - Sources\n    https://a\n  - Untitled Document\n    https://b\n"
        );
        assert_eq!(format_titles(Cdp::Lytics, &[]), "No documents stored for Lytics.\n");
    }

    #[test]
    fn test_modified_at_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(modified_at(&dir.path().join("nope.json")).is_none());
        let file = dir.path().join("lytics_docs.json");
        std::fs::write(&file, "[]").unwrap();
        assert!(modified_at(&file).is_some());
    }
}
