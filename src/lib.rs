//! legallify - audio transcription, summarization, and Minutes-of-Meeting generation
//!
//! Uploads are normalized to PCM WAV, transcribed and summarized through
//! remote inference endpoints, and rendered as Word/PDF minutes documents.

pub mod audio;
pub mod cli;
pub mod config;
pub mod document;
pub mod inference;
pub mod session;
pub mod tui;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "legallify";
