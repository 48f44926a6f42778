//! CLI configuration
//!
//! Loaded from `<config dir>/arbor/config.toml` (or `--config`), then
//! overridden by `ARBOR_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Hash primitive used to build trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HasherKind {
    #[default]
    Sha512,
    Blake3,
}

impl FromStr for HasherKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sha512" | "sha-512" => Ok(HasherKind::Sha512),
            "blake3" => Ok(HasherKind::Blake3),
            other => anyhow::bail!("Unknown hasher '{}'. Expected sha512 or blake3", other),
        }
    }
}

impl fmt::Display for HasherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HasherKind::Sha512 => write!(f, "sha512"),
            HasherKind::Blake3 => write!(f, "blake3"),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    hasher: Option<String>,
    log_level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub hasher: HasherKind,
    pub log_level: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hasher: HasherKind::Sha512,
            log_level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("arbor").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. The default location is used only if
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(hasher) = file.hasher {
            config.hasher = hasher.parse()?;
        }
        if let Some(log_level) = file.log_level {
            config.log_level = log_level;
        }
        if let Some(color) = file.color {
            config.color = color;
        }
        Ok(config)
    }

    /// Apply `ARBOR_HASHER`, `ARBOR_LOG_LEVEL` and `ARBOR_COLOR`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(hasher) = var("ARBOR_HASHER") {
            self.hasher = hasher.parse().context("ARBOR_HASHER")?;
        }
        if let Some(level) = var("ARBOR_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(color) = var("ARBOR_COLOR") {
            self.color = color
                .parse()
                .with_context(|| format!("ARBOR_COLOR must be true or false, got '{}'", color))?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("log_level must not be empty");
        }
        Ok(())
    }
}
