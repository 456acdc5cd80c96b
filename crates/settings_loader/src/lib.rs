//! # Settings Loader
//!
//! Loads the analyzer configuration (`config.json`) that tells a run which
//! brokerage export to read and which symbols count as cash.
//!
//! ## Features
//!
//! - Load settings from a specified file path (the CLI defaults to `config.json`)
//! - Validate required keys after parsing (`excel_filename`, `cash_symbols`)
//! - Resolve the export path relative to the config file
//! - Remediation guidance for every failure, so the CLI can tell the user how to fix it
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use settings_loader;
//!
//! let config = settings_loader::load_settings("config.json")?;
//! let export = settings_loader::resolve_excel_path("config.json", &config);
//! # Ok::<(), settings_loader::SettingsError>(())
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use models::AppConfig;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Minimal configuration shown to the user when loading fails.
pub const EXAMPLE_CONFIG: &str = r#"{
  "excel_filename": "AssetAllocation.xls",
  "cash_symbols": ["SPAXX**", "FDRXX**", "CORE**"]
}"#;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl SettingsError {
    /// Human-readable hint on how to fix the configuration.
    pub fn remediation(&self) -> String {
        let hint = match self {
            SettingsError::NotFound { .. } => {
                "Create a config.json next to the program (or pass --config <PATH>)."
            }
            SettingsError::Read { .. } => "Check that the file is readable by the current user.",
            SettingsError::Parse { .. } => {
                "The file must be a JSON object with the keys \"excel_filename\" and \"cash_symbols\"."
            }
            SettingsError::Invalid { .. } => "Fix the value named above.",
        };
        format!("{}\nExample config.json:\n{}", hint, EXAMPLE_CONFIG)
    }
}

/// Loads and validates the configuration from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SettingsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SettingsError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_settings(&raw, path)
}

/// Parses configuration text; `origin` is only used in error messages.
pub fn parse_settings(raw: &str, origin: &Path) -> Result<AppConfig> {
    let config: AppConfig = serde_json::from_str(raw).map_err(|source| SettingsError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate(&config).map_err(|reason| SettingsError::Invalid {
        path: origin.to_path_buf(),
        reason,
    })?;
    Ok(config)
}

fn validate(config: &AppConfig) -> std::result::Result<(), String> {
    if config.excel_filename.trim().is_empty() {
        return Err("\"excel_filename\" must not be empty".to_string());
    }
    if let Some(log) = &config.history_log {
        if log.trim().is_empty() {
            return Err("\"history_log\" must not be empty when given".to_string());
        }
    }
    if config.cash_symbol_set().is_empty() {
        // Legal, but every holding then counts as invested.
        tracing::warn!("cash_symbols is empty; no holding will be treated as cash");
    }
    Ok(())
}

/// Resolves `excel_filename` against the directory holding the config file.
pub fn resolve_excel_path<P: AsRef<Path>>(config_path: P, config: &AppConfig) -> PathBuf {
    let excel = PathBuf::from(config.excel_filename.trim());
    if excel.is_absolute() {
        return excel;
    }
    match config_path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(excel),
        _ => excel,
    }
}
