//! Configuration system for xmlquill.
//!
//! This module provides the configuration structure for xmlquill with sensible
//! defaults and support for serialization/deserialization via serde.
//! Configuration is loaded from a TOML file and merged with command-line
//! arguments in `main`.
//!
//! # Example
//!
//! ```
//! use xmlquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert!(config.trim_text);
//! assert_eq!(config.log_filter, "warn");
//!
//! // Create custom configuration
//! let custom = Config {
//!     show_attributes: false,
//!     ..Config::default()
//! };
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the xmlquill application.
///
/// # Fields
///
/// * `trim_text` - Trim text content when loading documents (default: true)
/// * `show_attributes` - Include attributes in match summaries (default: true)
/// * `log_filter` - Log filter used when `RUST_LOG` is unset (default: "warn")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Trim text content and drop whitespace-only text when loading
    #[serde(default = "default_trim_text")]
    pub trim_text: bool,

    /// Include attributes in match summaries
    #[serde(default = "default_show_attributes")]
    pub show_attributes: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_trim_text() -> bool {
    true
}

fn default_show_attributes() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trim_text: default_trim_text(),
            show_attributes: default_show_attributes(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/xmlquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("xmlquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|err| {
            // Logging is configured from this file, so it isn't running yet
            eprintln!("Warning: ignoring config file: {:#}", err);
            Self::default()
        })
    }

    /// Loads configuration from an explicit file.
    ///
    /// Missing fields take their defaults; a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
