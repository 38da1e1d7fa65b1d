//! Runtime settings for the dashboard binary.
//!
//! Precedence, lowest first: defaults, TOML file, environment, CLI flags.
use crate::error::{DashboardError, Result};
use crate::filter::ALL_REGIONS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_DATA: &str = "SEIA_DATA";
pub const ENV_OUTPUT_DIR: &str = "SEIA_OUTPUT_DIR";
pub const ENV_REGION: &str = "SEIA_REGION";
pub const ENV_PREVIEW_ROWS: &str = "SEIA_PREVIEW_ROWS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub region: String,
    pub preview_rows: usize,
}

/// Keys accepted in the TOML file. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    data_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    region: Option<String>,
    preview_rows: Option<usize>,
}

/// Values given on the command line; `None` leaves the setting alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub region: Option<String>,
    pub preview_rows: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_path: PathBuf::from("project.json"),
            output_dir: PathBuf::from("."),
            region: ALL_REGIONS.to_string(),
            preview_rows: 5,
        }
    }
}

impl Settings {
    pub fn load_from_file(mut self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: FileSettings = toml::from_str(&content)?;
        if let Some(v) = file.data_path {
            self.data_path = v;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.region {
            self.region = v;
        }
        if let Some(v) = file.preview_rows {
            self.preview_rows = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn load_from_env(self) -> Self {
        self.load_from_lookup(|key| env::var(key).ok())
    }

    /// Apply environment-style overrides read through `lookup`.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn load_from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_DATA).filter(|v| !v.is_empty()) {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_REGION).filter(|v| !v.is_empty()) {
            self.region = v;
        }
        if let Some(v) = lookup(ENV_PREVIEW_ROWS) {
            match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.preview_rows = n,
                _ => tracing::warn!(
                    "Invalid {} value '{}': expected a positive integer",
                    ENV_PREVIEW_ROWS,
                    v
                ),
            }
        }
        self
    }

    pub fn apply_cli(mut self, cli: CliOverrides) -> Result<Self> {
        if let Some(v) = cli.data_path {
            self.data_path = v;
        }
        if let Some(v) = cli.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = cli.region {
            self.region = v;
        }
        if let Some(v) = cli.preview_rows {
            self.preview_rows = v;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.preview_rows == 0 {
            return Err(DashboardError::config("preview_rows", "must be at least 1"));
        }
        if self.region.trim().is_empty() {
            return Err(DashboardError::config("region", "must not be empty"));
        }
        Ok(())
    }
}
