//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::document::DownloadFormat;

/// legallify - meeting audio to transcripts, summaries, and MOM documents
#[derive(Parser, Debug)]
#[command(name = "legallify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe and summarize an audio file, then write the MOM document
    Process {
        /// Audio file to process (wav, mp3, or mp4)
        file: PathBuf,

        /// Output document format
        #[arg(short, long, value_enum, default_value = "docx")]
        format: DownloadFormat,

        /// Output file path (defaults to mom_<date>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Transcribe only; leave the summary section empty
        #[arg(long)]
        skip_summary: bool,
    },

    /// Launch the interactive TUI
    Tui,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
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
