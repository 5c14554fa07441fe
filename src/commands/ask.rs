use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::commands::{parse_optional_cdp, AskArgs};
use crate::config::GeminiConfig;
use crate::docs::types::Cdp;
use crate::llm::GeminiClient;
use crate::router::query::{self, QueryType};
use crate::state::AppState;

/// Run the ask command
pub async fn run(state: &AppState, args: AskArgs) -> Result<()> {
    let question = args.question.trim();
    if question.is_empty() {
        anyhow::bail!("Question is empty");
    }

    let (cdp, query_type) = resolve_scope(question, &args)?;

    let llm = GeminiClient::new(GeminiConfig::from_env()?)?;
    info!(
        model = llm.model(),
        cdp = cdp.map(Cdp::key).unwrap_or("all"),
        query_type = %query_type,
        "Question received"
    );

    let router = state.router(Arc::new(llm));
    let answer = router
        .handle_query(question, cdp.map(Cdp::display_name), query_type)
        .await;

    println!("{}", format_answer(question, cdp, query_type, &answer));
    Ok(())
}

/// Explicit flags win; `--auto` fills whatever is missing from the question text.
///
/// Detection runs on the sanitized question. The question itself is passed on unchanged.
fn resolve_scope(question: &str, args: &AskArgs) -> Result<(Option<Cdp>, QueryType)> {
    let mut cdp = parse_optional_cdp(args.cdp.as_deref())?;
    let mut query_type = args
        .query_type
        .as_deref()
        .map(|t| t.parse::<QueryType>().unwrap_or_default());

    if args.auto {
        let sanitized = query::sanitize_query(question);
        cdp = cdp.or_else(|| query::detect_cdp(&sanitized));
        query_type = query_type.or_else(|| Some(query::detect_query_type(&sanitized)));
    }

    Ok((cdp, query_type.unwrap_or_default()))
}

fn format_answer(question: &str, cdp: Option<Cdp>, query_type: QueryType, answer: &str) -> String {
    let scope = cdp.map(Cdp::display_name).unwrap_or("All CDPs");
    format!(
        "Q: {}\nCDP: {} | Type: {}\n\n{}",
        question, scope, query_type, answer
    )
}
