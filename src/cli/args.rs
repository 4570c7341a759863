//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// recap - Summaries and main points from long transcripts
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a summary and main points into a JSON file
    Extract {
        /// Transcript file (.json, or plain text)
        input: PathBuf,

        /// Output file path (defaults to <input>.summary.json)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the JSON result instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Print a summary of a transcript
    Summarize {
        /// Transcript file (.json, or plain text)
        input: PathBuf,
    },

    /// Print the main points of a transcript, one per line
    Points {
        /// Transcript file (.json, or plain text)
        input: PathBuf,
    },

    /// Show how a transcript would be chunked, without calling a model
    Chunks {
        /// Transcript file (.json, or plain text)
        input: PathBuf,

        /// Token budget per chunk (defaults to the model's input budget)
        #[arg(short, long)]
        max_tokens: Option<usize>,

        /// Fraction of the budget repeated between chunks
        #[arg(long)]
        overlap: Option<f64>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
