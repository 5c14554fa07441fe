use anyhow::Result;

use crate::commands::{parse_optional_cdp, SearchArgs};
use crate::docs::types::Document;
use crate::state::AppState;

/// Run the search command
pub fn run(state: &AppState, args: SearchArgs) -> Result<()> {
    let cdp = parse_optional_cdp(args.cdp.as_deref())?;
    let results = state.store.search(&args.query, cdp, args.limit);

    if results.is_empty() {
        println!("No documents match {:?}.", args.query);
        return Ok(());
    }

    print!("{}", format_results(&results));
    Ok(())
}

fn format_results(results: &[Document]) -> String {
    let mut output = String::new();
    for (i, doc) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} [{}]\n   {}\n",
            i + 1,
            doc.title_or_default(),
            doc.source_or_default(),
            doc.url
        ));
    }
    output
}
