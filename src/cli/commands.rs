//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tokio_util::sync::CancellationToken;

use crate::audio::AudioBlob;
use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::document::{artifact_file_name, DownloadFormat, MomDocument};
use crate::inference::{HttpInferenceClient, InferenceApi, Summarizer, Transcriber};
use crate::session::SessionOrchestrator;

/// Run one audio file through the full pipeline and write the MOM document.
pub async fn process_file(
    settings: &Settings,
    file: PathBuf,
    format: DownloadFormat,
    output: Option<PathBuf>,
    skip_summary: bool,
) -> Result<()> {
    // Missing credential fails here, before any file or network work.
    let api: Arc<dyn InferenceApi> = Arc::new(HttpInferenceClient::from_settings(settings)?);

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Input path has no file name")?;

    let bytes = std::fs::read(&file)
        .with_context(|| format!("Failed to read audio file: {}", file.display()))?;
    let blob = AudioBlob::new(file_name, bytes)?;

    let orchestrator = SessionOrchestrator::new(
        Transcriber::from_settings(api.clone(), settings),
        Summarizer::from_settings(api, settings),
    );

    // Ctrl-C cancels between polls instead of killing the process mid-write.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    println!("Processing {}...", file.display());
    let outcome = if skip_summary {
        orchestrator.transcribe_only(blob, &cancel).await?
    } else {
        orchestrator.process_upload(blob, &cancel).await?
    };

    println!();
    println!("Transcription:");
    println!("{}", outcome.transcript);
    println!();

    match (&outcome.summary, &outcome.summary_error) {
        (Some(summary), _) => {
            println!("Summary:");
            println!("{}", summary);
        }
        (None, Some(e)) => {
            eprintln!("Summarization failed: {e}");
            eprintln!("The document will contain the transcription only.");
        }
        (None, None) => {}
    }

    let date = Local::now().date_naive();
    let document = MomDocument::new(
        outcome.transcript.clone(),
        outcome.summary.clone().unwrap_or_default(),
        date,
    );

    let rendered = document.render(format)?;
    let path = output.unwrap_or_else(|| PathBuf::from(artifact_file_name(format, date)));

    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write document: {}", path.display()))?;

    println!();
    println!("Minutes written to: {}", path.display());

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
