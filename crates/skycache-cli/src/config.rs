//! Configuration file management.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::{ConfigKey, OutputFormat};

/// Temperature units used for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn is_metric(self) -> bool {
        self == Units::Metric
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => f.write_str("metric"),
            Units::Imperial => f.write_str("imperial"),
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Preferred location setting
    #[serde(default)]
    pub location: Option<String>,

    /// Temperature units for display
    #[serde(default)]
    pub units: Units,

    /// Database file path
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path.
    ///
    /// `SKYCACHE_CONFIG` overrides the platform location.
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os("SKYCACHE_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycache")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Set one key from its string form.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::Location => {
                if value.is_empty() {
                    anyhow::bail!("Location setting must not be empty");
                }
                self.location = Some(value.to_string());
            }
            ConfigKey::Units => {
                self.units = Units::from_str(value, true)
                    .map_err(|_| anyhow!("Invalid units '{}'. Use: metric, imperial", value))?;
            }
            ConfigKey::DbPath => {
                if value.is_empty() {
                    anyhow::bail!("Database path must not be empty");
                }
                self.db_path = Some(PathBuf::from(value));
            }
            ConfigKey::Format => {
                let format = OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow!("Invalid format '{}'. Use: text, json, csv", value))?;
                self.format = Some(format);
            }
        }
        Ok(())
    }

    /// Reset one key to its default.
    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Location => self.location = None,
            ConfigKey::Units => self.units = Units::default(),
            ConfigKey::DbPath => self.db_path = None,
            ConfigKey::Format => self.format = None,
        }
    }
}

/// Resolve the database path: explicit flag, then config, then the platform default.
pub fn resolve_db_path(db: Option<PathBuf>, config: &Config) -> PathBuf {
    db.or_else(|| config.db_path.clone())
        .unwrap_or_else(skycache_store::default_db_path)
}

/// Resolve output format: explicit flag overrides config.
pub fn resolve_format(format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    format.or(config.format).unwrap_or_default()
}

/// Resolve units: explicit flag overrides config.
pub fn resolve_units(units: Option<Units>, config: &Config) -> Units {
    units.unwrap_or(config.units)
}

/// Resolve the location setting from arg or config.
pub fn resolve_location(location: Option<String>, config: &Config) -> Option<String> {
    location.or_else(|| config.location.clone())
}
