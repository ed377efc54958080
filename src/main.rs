//! simplesearch: BM25, semantic and RRF-fused search over one Vespa collection

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{init_config, search_once, serve, OutputFormat};
use simplesearch::config::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simplesearch")]
#[command(about = "Hybrid search dispatcher: lexical, semantic and fused rankings")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults apply when it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP search service
    Serve {
        /// Listen address (host:port)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Run one search and print the result
    Search {
        /// Search query
        query: String,

        /// Number of results (clamped into [1, max_limit])
        #[arg(short, long)]
        limit: Option<i64>,

        /// Ranking profile (bm25, semantic, fusion)
        #[arg(short, long)]
        ranking: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write a default configuration file
    Init {
        /// Output file or directory
        #[arg(default_value = "config.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen } => {
            let config = load_config(&cli.config, cli.verbose)?;
            serve(config, listen).await
        }
        Commands::Search {
            query,
            limit,
            ranking,
            format,
        } => {
            let config = load_config(&cli.config, cli.verbose)?;
            search_once(config, query, limit, ranking, format).await
        }
        // Needs neither logging nor a loadable config file
        Commands::Init { path, force } => init_config(path, force).await,
    }
}

/// Load config (file, then environment) and start logging
fn load_config(path: &Path, verbose: u8) -> Result<Config> {
    let config = Config::load_or_default(path)?;
    config.logging.init(verbose)?;
    Ok(config)
}
