//! CLI command definitions and handlers

pub mod ask;
pub mod examples;
pub mod ingest;
pub mod search;
pub mod seed;
pub mod sources;

use clap::{Parser, Subcommand};

use crate::docs::types::Cdp;
use crate::error::Result;

/// CDP support agent - answers how-to questions about Segment, mParticle, Lytics and Zeotap
#[derive(Parser, Debug)]
#[command(name = "cdp-agent")]
#[command(author, version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question, answered from the stored documentation
    Ask(AskArgs),

    /// Search stored documents directly (no model)
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Show document counts and load status per CDP, or one CDP's titles
    Sources(SourcesArgs),

    /// Fetch pages and store them as one CDP's documents
    #[command(after_help = "EXAMPLES:
    cdp-agent ingest segment https://segment.com/docs/connections/sources/
    cdp-agent ingest lytics https://docs.lytics.com/docs/a https://docs.lytics.com/docs/b

Replaces every stored document for that CDP.")]
    Ingest(IngestArgs),

    /// Write the built-in sample documents
    Seed(SeedArgs),

    /// Print example questions
    Examples(ExamplesArgs),
}

#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    cdp-agent ask \"How do I set up a new source?\" --cdp segment
    cdp-agent ask \"How does audience creation compare?\" --type comparison
    cdp-agent ask \"Advanced identity setup in mParticle?\" --auto")]
pub struct AskArgs {
    /// The question
    pub question: String,

    /// CDP to ask about (segment, mparticle, lytics, zeotap)
    #[arg(long)]
    pub cdp: Option<String>,

    /// Query type: how-to, comparison or advanced
    #[arg(short = 't', long = "type")]
    pub query_type: Option<String>,

    /// Detect CDP and query type from the question when not given
    #[arg(long)]
    pub auto: bool,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Literal search string
    pub query: String,

    /// Restrict to one CDP
    #[arg(long)]
    pub cdp: Option<String>,

    /// Max results
    #[arg(short = 'n', long, default_value_t = crate::docs::DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,
}

#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// List the stored titles for this CDP
    #[arg(long)]
    pub cdp: Option<String>,
}

#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// CDP the pages belong to
    pub cdp: String,

    /// Pages to fetch
    #[arg(required = true)]
    pub urls: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Seed only this CDP (default: all)
    pub cdp: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ExamplesArgs {
    /// Scope the questions to this CDP
    #[arg(long)]
    pub cdp: Option<String>,
}

/// Parse a CDP name given on the command line.
pub fn parse_cdp(name: &str) -> Result<Cdp> {
    name.parse()
}

/// Parse an optional CDP argument.
pub fn parse_optional_cdp(name: Option<&str>) -> Result<Option<Cdp>> {
    name.map(parse_cdp).transpose()
}
