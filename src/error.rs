//! Error types for the dashboard library.
//!
//! Aggregations never fail; these errors only come out of loading the
//! dataset, reading configuration and writing exports.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported dataset format for {path} (expected .json or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid configuration value for {key}: {reason}")]
    Config { key: String, reason: String },
}

impl DashboardError {
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
