use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::logs::{FlushPolicy, LogSettings, MAX_CLEANSE, REFRESH_RATE};

pub const DEFAULT_CONFIG_FILE: &str = "tailview.toml";
pub const DEFAULT_LOG_BUFFER_SIZE: usize = 200;
pub const LOG_BUFFER_ENV: &str = "TAILVIEW_LOG_BUFFER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {details}")]
    Invalid { details: String },

    #[error("invalid value `{value}` for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSpec {
    pub name: String,
    pub run: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TailConfig {
    #[serde(default = "default_selection")]
    pub selection: String,
    #[serde(default = "default_log_buffer_size")]
    pub log_buffer_size: usize,
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
    #[serde(default = "default_cleanse_every")]
    pub cleanse_every: usize,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

fn default_selection() -> String {
    "default/local".to_owned()
}

fn default_log_buffer_size() -> usize {
    DEFAULT_LOG_BUFFER_SIZE
}

fn default_refresh_rate_ms() -> u64 {
    REFRESH_RATE.as_millis() as u64
}

fn default_cleanse_every() -> usize {
    MAX_CLEANSE
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            selection: default_selection(),
            log_buffer_size: default_log_buffer_size(),
            refresh_rate_ms: default_refresh_rate_ms(),
            cleanse_every: default_cleanse_every(),
            containers: Vec::new(),
        }
    }
}

impl TailConfig {
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: TailConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or `tailview.toml` in `cwd` when present, then
    /// applies environment overrides.
    pub fn load(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|candidate| candidate.is_file()),
        };
        let mut config = match resolved {
            Some(path) => {
                let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                Self::parse(&raw, &path)?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::var(LOG_BUFFER_ENV).ok().as_deref())?;
        Ok(config)
    }

    pub fn apply_env(&mut self, log_buffer: Option<&str>) -> Result<(), ConfigError> {
        let Some(raw) = log_buffer else {
            return Ok(());
        };
        match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => {
                self.log_buffer_size = size;
                Ok(())
            }
            _ => Err(ConfigError::InvalidEnv {
                name: LOG_BUFFER_ENV,
                value: raw.to_owned(),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_buffer_size == 0 {
            return Err(invalid("log_buffer_size must be greater than zero"));
        }
        if self.refresh_rate_ms == 0 {
            return Err(invalid("refresh_rate_ms must be greater than zero"));
        }
        if self.cleanse_every == 0 {
            return Err(invalid("cleanse_every must be greater than zero"));
        }
        let mut seen = HashSet::new();
        for container in &self.containers {
            if container.name.trim().is_empty() {
                return Err(invalid("container name must not be empty"));
            }
            if !seen.insert(container.name.as_str()) {
                return Err(invalid(&format!(
                    "duplicate container `{}`",
                    container.name
                )));
            }
        }
        Ok(())
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        FlushPolicy {
            refresh_rate: Duration::from_millis(self.refresh_rate_ms),
            cleanse_every: self.cleanse_every,
        }
    }
}

impl LogSettings for TailConfig {
    fn log_buffer_size(&self) -> usize {
        self.log_buffer_size
    }
}

fn invalid(details: &str) -> ConfigError {
    ConfigError::Invalid {
        details: details.to_owned(),
    }
}
