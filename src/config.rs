use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::bands::{BandThresholds, RecommendationTable};
use crate::pipeline::classify::Scorer;

pub const DEFAULT_MODEL_PATH: &str = "employee_performance_model.json";
pub const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Replacement advice per band; unset entries keep the built-in text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdviceOverrides {
    pub excellent: Option<String>,
    pub good: Option<String>,
    pub needs_support: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub load_timeout_secs: u64,
    pub thresholds: BandThresholds,
    pub advice: AdviceOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            thresholds: BandThresholds::default_v1(),
            advice: AdviceOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.check().map_err(ConfigError::Invalid)?;
        if self.load_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "load_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    pub fn recommendations(&self) -> RecommendationTable {
        let mut table = RecommendationTable::default_v1();
        if let Some(text) = &self.advice.excellent {
            table.excellent.advice = text.clone();
        }
        if let Some(text) = &self.advice.good {
            table.good.advice = text.clone();
        }
        if let Some(text) = &self.advice.needs_support {
            table.needs_support.advice = text.clone();
        }
        table
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(self.thresholds, self.recommendations())
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
