//! User configuration.
//!
//! Settings come from `config.toml` in the platform config directory (or a
//! path given with `--config`). Command-line flags override the file; unset
//! values fall back to built-in defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::search::{DEFAULT_DEBOUNCE_MS, DEFAULT_EMPHASIS_MS};

// Upper bounds for configured timings
const MAX_DEBOUNCE_MS: u64 = 5_000;
const MAX_EMPHASIS_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Quiet period before a typed search query runs (milliseconds)
    pub search_debounce_ms: Option<u64>,
    /// How long a navigated-to message stays highlighted (milliseconds)
    pub emphasis_ms: Option<u64>,
    /// Log file for the interactive UI
    pub log_file: Option<PathBuf>,
    /// Where to save the session transcript on exit
    pub transcript: Option<PathBuf>,
    /// Extra knowledge-base topics, topic -> answer
    #[serde(default)]
    pub topics: BTreeMap<String, String>,
}

impl UserConfig {
    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: UserConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn search_debounce(&self) -> Duration {
        let ms = self.search_debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS).min(MAX_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    pub fn emphasis(&self) -> Duration {
        let ms = self.emphasis_ms.unwrap_or(DEFAULT_EMPHASIS_MS).min(MAX_EMPHASIS_MS);
        Duration::from_millis(ms)
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, transcript: Option<PathBuf>, log_file: Option<PathBuf>) -> Self {
        if transcript.is_some() {
            self.transcript = transcript;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self
    }
}
