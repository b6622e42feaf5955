use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WatchdogConfig {
    #[serde(default = "default_cpu_threshold_percent")]
    pub cpu_threshold_percent: f64,
    #[serde(default = "default_ram_threshold_percent")]
    pub ram_threshold_percent: f64,
    #[serde(default = "default_net_threshold_mb")]
    pub net_threshold_mb: u64,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_retention_idle_secs")]
    pub retention_idle_secs: u64,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            cpu_threshold_percent: default_cpu_threshold_percent(),
            ram_threshold_percent: default_ram_threshold_percent(),
            net_threshold_mb: default_net_threshold_mb(),
            check_interval_secs: default_check_interval_secs(),
            retention_idle_secs: default_retention_idle_secs(),
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl WatchdogConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: WatchdogConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path_display,
                source,
            })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_percent("cpu_threshold_percent", self.cpu_threshold_percent)?;
        validate_percent("ram_threshold_percent", self.ram_threshold_percent)?;
        if self.net_threshold_mb < 1 {
            return Err(ConfigError::Validation(
                "net_threshold_mb must be >= 1".to_string(),
            ));
        }
        if self.check_interval_secs < 1 {
            return Err(ConfigError::Validation(
                "check_interval_secs must be >= 1".to_string(),
            ));
        }
        if self.retention_idle_secs < 1 {
            return Err(ConfigError::Validation(
                "retention_idle_secs must be >= 1".to_string(),
            ));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "log_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn retention_idle(&self) -> Duration {
        Duration::from_secs(self.retention_idle_secs)
    }

    pub fn net_threshold_bytes(&self) -> u64 {
        self.net_threshold_mb.saturating_mul(1024 * 1024)
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

fn validate_percent(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{field} must be in range 0..100"
        )));
    }
    Ok(())
}

const fn default_cpu_threshold_percent() -> f64 {
    85.0
}

const fn default_ram_threshold_percent() -> f64 {
    85.0
}

const fn default_net_threshold_mb() -> u64 {
    50
}

const fn default_check_interval_secs() -> u64 {
    5
}

const fn default_retention_idle_secs() -> u64 {
    3600
}

fn default_log_path() -> PathBuf {
    PathBuf::from("./logs/hostwatch.log")
}
