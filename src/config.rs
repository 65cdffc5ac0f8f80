//! Configuration system using TOML files.
//!
//! Config is read from the OS-standard config directory:
//! - Windows: %APPDATA%\smart-shuffle\config.toml
//! - macOS: ~/Library/Application Support/smart-shuffle/config.toml
//! - Linux: ~/.config/smart-shuffle/config.toml
//!
//! Only shell defaults live here. Playlist contents are never written
//! anywhere; every session starts empty.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub playlist: PlaylistConfig,

    /// Interactive shell settings
    pub shell: ShellConfig,
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Initial cooldown window (K). 0 = no artist restriction.
    pub cooldown_window: usize,
}

/// How the shell renders engine results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Interactive shell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt written before each command
    pub prompt: String,

    /// Print every candidate examined by NEXT
    pub show_trace: bool,

    /// Output format
    pub format: OutputFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "playlist > ".to_string(),
            show_trace: true,
            format: OutputFormat::Text,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smart-shuffle"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    load_or_default(&path)
}

/// Load configuration from `path`, falling back to defaults on any error.
pub fn load_or_default(path: &Path) -> Config {
    match load_from(path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from `path`.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================
