//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod letter;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use suratai::{GeminiConfig, LetterAssistant};

#[derive(Parser)]
#[command(name = "surat")]
#[command(about = "Summarize letters and extract their metadata with Gemini")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML with a [gemini] table)
    #[arg(short, long, global = true, env = "SURAT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether an API key is configured
    Status,

    /// Summarize a letter into one sentence
    Summarize {
        /// Text file to read (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Extract number, sender, receiver, title and category from letter text
    Extract {
        /// Text file to read (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Analyze a scanned letter (image or PDF) and print its metadata
    Scan {
        /// Image or PDF to analyze
        file: PathBuf,
        /// MIME type (detected from content if omitted)
        #[arg(short, long)]
        mime: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = GeminiConfig::load(cli.config.as_deref())?;
    let assistant = LetterAssistant::from_config(&config);

    match cli.command {
        Commands::Status => status::cmd_status(&config, &assistant),
        Commands::Summarize { file } => letter::cmd_summarize(&assistant, file.as_deref()).await,
        Commands::Extract { file } => letter::cmd_extract(&assistant, file.as_deref()).await,
        Commands::Scan { file, mime } => {
            letter::cmd_scan(&assistant, &file, mime.as_deref()).await
        }
    }
}
