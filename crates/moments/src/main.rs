//! Moments CLI - caption and tag a photo gallery with a cloud vision API.
//!
//! Each image in a folder is sent to Azure Computer Vision; the returned
//! caption and tags are upserted into a SQLite gallery of photos and tags.
//!
//! # Usage
//!
//! ```bash
//! # Reconcile a folder of uploads into the gallery
//! moments sync ./uploads
//!
//! # Replace existing descriptions instead of keeping them
//! moments sync ./uploads --overwrite-descriptions
//!
//! # Look at what the API says without writing anything
//! moments analyze ./uploads/beach.jpg
//!
//! # Inspect the gallery
//! moments photos list
//! ```
//!
//! Credentials come from `AZURE_VISION_ENDPOINT` and `AZURE_VISION_KEY`,
//! which may also be placed in a `.env` file in the working directory.

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Moments - caption and tag a photo gallery with a cloud vision API.
#[derive(Parser, Debug)]
#[command(name = "moments")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a folder of images and upsert captions and tags into the gallery
    Sync(cli::sync::SyncArgs),

    /// Analyze images and print the results without touching the gallery
    Analyze(cli::analyze::AnalyzeArgs),

    /// Inspect photos stored in the gallery
    Photos(cli::photos::PhotosArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; real environment variables still apply.
    let dotenv_path = dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match moments_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `moments config path`."
            );
            moments_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Moments v{}", moments_core::VERSION);
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Sync(args) => cli::sync::execute(args, config).await,
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Photos(args) => cli::photos::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
