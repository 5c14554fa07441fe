use anyhow::Result;

use crate::commands::{parse_optional_cdp, ExamplesArgs};
use crate::docs::types::Cdp;
use crate::router::query::{self, QueryType};

/// Run the examples command
pub fn run(args: ExamplesArgs) -> Result<()> {
    let cdp = parse_optional_cdp(args.cdp.as_deref())?;
    let examples = query::example_questions(cdp.map(Cdp::display_name));
    print!("{}", format_examples(&examples));
    Ok(())
}

fn format_examples(examples: &[(QueryType, Vec<String>)]) -> String {
    let mut output = String::new();
    for (query_type, questions) in examples {
        output.push_str(&format!("{}:\n", query_type));
        for q in questions {
            output.push_str(&format!("  - {}\n", q));
        }
        output.push('\n');
    }
    output
}
