//! CLI-specific configuration structures for TOML-based configuration.

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use sstv_core::DecoderOptions;
use std::path::{Path, PathBuf};

/// Complete CLI configuration bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// SSTV mode name (spec §6 supported-modes table), e.g. "robot36".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Decoder tuning knobs (spec §12); protocol timings are not
    /// user-configurable.
    #[serde(default)]
    pub decoder: DecoderOptions,

    /// Terminal interface configuration.
    #[serde(default)]
    pub terminal: TerminalConfig,
}

fn default_mode() -> String {
    "robot36".to_string()
}

/// Terminal interface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Directory to write periodic PNG snapshots of the framebuffer
    /// (CLI convenience, outside the core specification).
    #[serde(default)]
    pub png_output_dir: Option<PathBuf>,

    /// Number of lines between PNG snapshots, if `png_output_dir` is set.
    #[serde(default = "default_snapshot_interval_lines")]
    pub snapshot_interval_lines: usize,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_snapshot_interval_lines() -> usize {
    16
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            png_output_dir: None,
            snapshot_interval_lines: default_snapshot_interval_lines(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_target")]
    pub target: LogTarget,

    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_target() -> LogTarget {
    LogTarget::Stderr
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            target: default_log_target(),
            file_path: None,
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Logfmt,
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            decoder: DecoderOptions::default(),
            terminal: TerminalConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a single TOML file. Unlike the prior
    /// pipeline's multi-file `include` merge, one file is the whole
    /// configuration here.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content).wrap_err("failed to parse TOML configuration")
    }
}
