mod commands;
mod config;
mod docs;
mod error;
mod llm;
mod router;
mod state;
mod text;
mod timing;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Cli, Commands};
use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load env
    let _ = dotenv::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("CDP_AGENT_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    debug!(?cli, "Parsed arguments");

    match cli.command {
        // needs no store
        Commands::Examples(args) => commands::examples::run(args),
        command => {
            let state = AppState::new(AppConfig::from_env()?);
            info!("Document store initialized at {:?}", state.store.data_dir());
            let failures = state.store.last_load().failures();
            if failures > 0 {
                warn!(failures, "Some document files could not be loaded");
            }
            dispatch(&state, command).await
        }
    }
}

async fn dispatch(state: &AppState, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ask(args) => commands::ask::run(state, args).await,
        Commands::Search(args) => commands::search::run(state, args),
        Commands::Sources(args) => commands::sources::run(state, args),
        Commands::Ingest(args) => commands::ingest::run(state, args).await,
        Commands::Seed(args) => commands::seed::run(state, args),
        Commands::Examples(args) => commands::examples::run(args),
    }
}
