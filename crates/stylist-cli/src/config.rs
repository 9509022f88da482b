use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stylist_core::{PaletteTable, Season};

/// Default timeout for the remote recommender, in seconds.
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// CLI configuration: TOML file, then `STYLIST_*` environment overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Season used when `--season` is not given.
    pub default_season: Season,
    pub remote: RemoteConfig,
    /// Palette per undertone; omitted entries keep the built-in colours.
    pub palettes: PaletteTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Recommendation endpoint. Unset means offline: local lookup only.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_season: Season::Summer,
            remote: RemoteConfig::default(),
            palettes: PaletteTable::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields the
    /// defaults. Environment overrides are applied on top either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(path) => Self::read(path)?,
            None => Self::from_file(&default_config_path())?,
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Like [`Config::read`], but a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::read(path)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply `STYLIST_*` overrides read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(season) = var("STYLIST_SEASON") {
            self.default_season = Season::from_label(&season);
        }
        if let Some(endpoint) = var("STYLIST_REMOTE_ENDPOINT") {
            let endpoint = endpoint.trim();
            self.remote.endpoint = (!endpoint.is_empty()).then(|| endpoint.to_string());
        }
        if let Some(secs) = var("STYLIST_REMOTE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.remote.timeout_secs = secs;
        }
    }
}

/// `$STYLIST_CONFIG`, else `$XDG_CONFIG_HOME/stylist/config.toml`, else
/// `~/.config/stylist/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("STYLIST_CONFIG") {
        return PathBuf::from(path);
    }
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("stylist")
        .join("config.toml")
}
