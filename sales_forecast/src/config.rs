//! Pipeline configuration

use crate::error::{ForecastError, Result};
use crate::features::HistoryPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Settings shared by the loader, feature builder and pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Trained model artifact
    pub model_path: Option<PathBuf>,
    /// What to do when fewer than six months precede the target
    pub history_policy: HistoryPolicy,
    /// chrono format of the transaction `month` column
    pub date_format: String,
    /// CSV field delimiter, ASCII only
    pub delimiter: char,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            history_policy: HistoryPolicy::default(),
            date_format: "%Y-%m-%d".to_string(),
            delimiter: ',',
        }
    }
}

impl ForecastConfig {
    /// Read a JSON configuration file; absent keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(ForecastError::InvalidParameter(format!(
                "Delimiter must be an ASCII character, got '{}'",
                self.delimiter
            )));
        }

        if self.date_format.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Date format must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
