//! relog configuration, loadable from TOML.

use std::path::Path;

use anyhow::Context;
use chrono::format::{Item, StrftimeItems};
use clap::ValueEnum;
use serde::Deserialize;

use relog_core::parsers::{DEFAULT_MAX_BUFFERED_BYTES, DEFAULT_PADDING_WINDOW};
use relog_core::{RelogError, RelogOptions, RelogResult, TimestampCarry};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "relog.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelogConfig {
    /// History length of each padded MongoDB caller column.
    #[serde(default = "default_padding_window")]
    pub padding_window: usize,
    /// Largest multi-line JSON object kept while waiting for its end.
    #[serde(default = "default_max_buffered_bytes")]
    pub max_buffered_bytes: usize,
    /// Whether lines without a timestamp reuse the previous one.
    #[serde(default)]
    pub timestamp_carry: TimestampCarry,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_padding_window() -> usize {
    DEFAULT_PADDING_WINDOW
}

fn default_max_buffered_bytes() -> usize {
    DEFAULT_MAX_BUFFERED_BYTES
}

impl Default for RelogConfig {
    fn default() -> Self {
        Self {
            padding_window: default_padding_window(),
            max_buffered_bytes: default_max_buffered_bytes(),
            timestamp_carry: TimestampCarry::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Output rendering settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub color: ColorMode,
    /// chrono strftime pattern for the console time column.
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_time_format() -> String {
    "%b-%d %H:%M".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: ColorMode::default(),
            time_format: default_time_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, colorized text.
    #[default]
    Console,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

impl RelogConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else `relog.toml` from `dir` when it
    /// exists, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::debug!(path = %fallback.display(), "using config from working directory");
            return Self::from_file(&fallback);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> RelogResult<()> {
        if self.padding_window == 0 {
            return Err(RelogError::Config("padding_window must be greater than 0".into()));
        }
        if self.max_buffered_bytes == 0 {
            return Err(RelogError::Config(
                "max_buffered_bytes must be greater than 0".into(),
            ));
        }
        let time_format = &self.output.time_format;
        if time_format.trim().is_empty()
            || StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error))
        {
            return Err(RelogError::Config(format!(
                "output.time_format {time_format:?} is not a valid strftime pattern"
            )));
        }
        Ok(())
    }

    pub fn relog_options(&self, colorize: bool) -> RelogOptions {
        RelogOptions {
            padding_window: self.padding_window,
            max_buffered_bytes: self.max_buffered_bytes,
            timestamp_carry: self.timestamp_carry,
            colorize,
        }
    }
}
