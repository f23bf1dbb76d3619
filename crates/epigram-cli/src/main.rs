//! epigram CLI
//!
//! Command-line interface for epigram - a quote collection with category
//! filtering and server-wins sync.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use epigram_core::QuoteStore;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "epigram")]
#[command(about = "epigram - quote collection with server-wins sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Show {
        /// Pick from this category and make it the active filter
        #[arg(short, long, conflicts_with = "all")]
        category: Option<String>,
        /// Clear the active filter and pick from every category
        #[arg(long)]
        all: bool,
    },
    /// Show the quote displayed last in this session
    Last,
    /// Add a quote
    Add {
        /// The quote text
        text: String,
        /// Category for the quote
        #[arg(short, long)]
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all categories
    Categories,
    /// Export the collection to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Import quotes from a JSON file
    Import {
        /// Source file (must contain a JSON array)
        path: PathBuf,
    },
    /// Sync with the quote server now
    Sync,
    /// Keep syncing on the configured interval
    Watch,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (counts, sync state)
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, server_url, sync_enabled, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, &output),
        };
    }

    let mut store = QuoteStore::open()?;

    match cli.command {
        Commands::Show { category, all } => {
            commands::quote::show(&mut store, category, all, &output)
        }
        Commands::Last => commands::quote::last(&store, &output),
        Commands::Add { text, category } => {
            commands::quote::add(&mut store, text, category, &output)
        }
        Commands::List { category } => commands::quote::list(&store, category, &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Export { path } => commands::transfer::export(&store, path, &output),
        Commands::Import { path } => commands::transfer::import(&mut store, path, &output),
        Commands::Sync => commands::sync::sync(&mut store, &output).await,
        Commands::Watch => commands::sync::watch(&mut store, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    }
}
