//! legallify - meeting audio to transcripts, summaries, and MOM documents
//!
//! Entry point for the legallify CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use legallify::cli::{Cli, Commands};
use legallify::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            legallify::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Process {
                    file,
                    format,
                    output,
                    skip_summary,
                } => {
                    legallify::cli::commands::process_file(
                        &settings,
                        file,
                        format,
                        output,
                        skip_summary,
                    )
                    .await?;
                }
                Commands::Tui => {
                    legallify::tui::run(&settings).await?;
                }
                Commands::Config(config_cmd) => {
                    legallify::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
