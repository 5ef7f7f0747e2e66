use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};
use virtual_library_catalog::client::BookSearchClient;
use virtual_library_catalog::search_sequencer::SearchSequencer;
use virtual_library_history::search_history::SearchHistoryStore;
use virtual_library_history::settings_store::FileSettingsStore;

use crate::settings::DiscoverSettings;

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "virtual-library-discover")]
#[command(about = "Search the book catalog and manage recent searches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title and remember the query
    Search {
        /// Title to search for
        query: String,
    },
    /// Show or edit recent searches
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent searches, most recent first
    List,
    /// Forget a recent search
    Remove { query: String },
}

// Same layering as the service binaries, without an exporter
// Logs go to stderr so stdout only carries command output
fn init_telemetry() -> anyhow::Result<()> {
    let app_name = "virtual_library_discover";

    // Filter based on level - trace, debug, info, warn, error
    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stderr);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install `tracing` subscriber.")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry()?;
    let cli = Cli::parse();

    let settings = DiscoverSettings::load()?;
    let settings_store = FileSettingsStore::open(&settings.history_path)
        .with_context(|| format!("Failed to open {}", settings.history_path.display()))?;
    let history = SearchHistoryStore::new(Arc::new(settings_store));

    match cli.command {
        Commands::Search { query } => {
            let client = BookSearchClient::new(settings.client_config())?;
            let sequencer = SearchSequencer::default();
            if let Some(books) =
                commands::submit_search(&client, &sequencer, &history, &query).await?
            {
                println!("{}", serde_json::to_string_pretty(&books)?);
            }
        }
        Commands::History { command } => match command.unwrap_or(HistoryCommands::List) {
            HistoryCommands::List => {
                for search in history.list() {
                    println!("{}", search);
                }
            }
            HistoryCommands::Remove { query } => {
                commands::remove_recent_search(&history, &query)?;
            }
        },
    }
    Ok(())
}
