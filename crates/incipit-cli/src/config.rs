//! Application configuration loaded from a TOML file.
//!
//! Resolution order:
//!   1. `--config <FILE>` if given (an error if missing)
//!   2. `$XDG_CONFIG_HOME/incipit/config.toml` (platform equivalent)
//!   3. built-in defaults
//!
//! Everything under `[variables]` is fed into the bootstrap
//! environment as unconfirmed values, so it shows up as prompt
//! defaults rather than silently winning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;

/// Top-level configuration file schema.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub output: OutputConfig,

    /// Pre-seeded variable values, keyed by variable name.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

/// Default answers for the most common `new` arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub build_system: Option<String>,
    pub license: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration, falling back to defaults when no file
    /// exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self, CliError> {
        debug!(path = %path.display(), "loading configuration");
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            CliError::ConfigError(format!("cannot parse {}: {e}", path.display()))
        })
    }

    /// Platform config path, e.g. `~/.config/incipit/config.toml` on
    /// Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "incipit", "incipit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
