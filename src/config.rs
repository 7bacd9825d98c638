use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fuel::CalcMode;
use crate::units::HeatingValueUnit;

/// Default location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Largest number of decimals the reports will print.
pub const MAX_PRECISION: usize = 10;

/// Settings for the HTML form server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:8080`
    pub addr: String,
    /// Directory served under `/static/`
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".into(),
            static_dir: "static".into(),
        }
    }
}

/// Application settings stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `auto`, `uk`, `en`, ...
    pub language: String,
    /// Extra directory searched for `<lang>.toml` language packs.
    pub language_pack_dir: Option<String>,
    pub default_mode: CalcMode,
    /// Decimal places in reports.
    pub precision: usize,
    pub heating_value_unit: HeatingValueUnit,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            default_mode: CalcMode::WorkingToDry,
            precision: 3,
            heating_value_unit: HeatingValueUnit::MjPerKg,
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads the config at `path`, creating it with defaults when absent.
pub fn load_or_default_at(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let mut cfg: Config = toml::from_str(&content)?;
        cfg.precision = cfg.precision.min(MAX_PRECISION);
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_config(self, path.as_ref())
    }

    pub fn static_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.static_dir)
    }
}
