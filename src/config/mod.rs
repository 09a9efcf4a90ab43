//! Configuration module for legallify
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{ConfigError, Settings};
