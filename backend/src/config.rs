//! Application configuration.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. A missing file is not an error: every setting has a default.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//! max_upload_mb = 10
//!
//! [analytics]
//! iqr_multiplier = 1.5
//! min_outlier_samples = 4
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::algorithms::analysis::{DEFAULT_IQR_MULTIPLIER, DEFAULT_MIN_OUTLIER_SAMPLES};
use crate::algorithms::{AnalyticsEngine, OutlierPolicy};

/// Environment variable holding an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "EQUIPMENT_CONFIG";
pub const CONFIG_FILE_NAME: &str = "equipment.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for request bodies, uploads included
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    #[serde(default = "default_min_outlier_samples")]
    pub min_outlier_samples: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_iqr_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}

fn default_min_outlier_samples() -> usize {
    DEFAULT_MIN_OUTLIER_SAMPLES
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            iqr_multiplier: default_iqr_multiplier(),
            min_outlier_samples: default_min_outlier_samples(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file without applying overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `equipment.toml` from the first standard location that has one.
    ///
    /// Searches, in order:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists in any of them.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Full load: file (explicit path or standard locations), then environment
    /// overrides, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `HOST`, `PORT`, `MAX_UPLOAD_MB`, `IQR_MULTIPLIER`
    /// and `MIN_OUTLIER_SAMPLES` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = parse_override(&lookup, "PORT")? {
            self.server.port = port;
        }
        if let Some(limit) = parse_override(&lookup, "MAX_UPLOAD_MB")? {
            self.server.max_upload_mb = limit;
        }
        if let Some(multiplier) = parse_override(&lookup, "IQR_MULTIPLIER")? {
            self.analytics.iqr_multiplier = multiplier;
        }
        if let Some(samples) = parse_override(&lookup, "MIN_OUTLIER_SAMPLES")? {
            self.analytics.min_outlier_samples = samples;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        if self.server.max_upload_mb == 0 {
            return Err(ConfigError::Invalid(
                "server.max_upload_mb must be at least 1".to_string(),
            ));
        }
        let multiplier = self.analytics.iqr_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "analytics.iqr_multiplier must be a positive number, got {}",
                multiplier
            )));
        }
        if self.analytics.min_outlier_samples == 0 {
            return Err(ConfigError::Invalid(
                "analytics.min_outlier_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn outlier_policy(&self) -> OutlierPolicy {
        OutlierPolicy {
            iqr_multiplier: self.analytics.iqr_multiplier,
            min_samples: self.analytics.min_outlier_samples,
        }
    }

    pub fn engine(&self) -> AnalyticsEngine {
        AnalyticsEngine::new(self.outlier_policy())
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value: raw,
            }),
    }
}
