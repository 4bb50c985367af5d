use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{CuratorError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub labels: LabelsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub all_notams: String,
    pub filtered_notams: String,
    pub excluded_notams: String,
    pub silver_dataset: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(constants::DEFAULT_DATA_DIR),
            all_notams: constants::ALL_NOTAMS_FILE.to_string(),
            filtered_notams: constants::FILTERED_NOTAMS_FILE.to_string(),
            excluded_notams: constants::EXCLUDED_NOTAMS_FILE.to_string(),
            silver_dataset: constants::SILVER_DATASET_FILE.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn all_notams_path(&self) -> PathBuf {
        self.data_dir.join(&self.all_notams)
    }

    pub fn filtered_notams_path(&self) -> PathBuf {
        self.data_dir.join(&self.filtered_notams)
    }

    pub fn excluded_notams_path(&self) -> PathBuf {
        self.data_dir.join(&self.excluded_notams)
    }

    pub fn silver_dataset_path(&self) -> PathBuf {
        self.data_dir.join(&self.silver_dataset)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub low_confidence_threshold: f64,
    pub backup: bool,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: constants::DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            backup: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    /// when it does not exist. Environment overrides are applied either way.
    pub fn load() -> Result<Self> {
        let path = Path::new(constants::DEFAULT_CONFIG_FILE);
        let config = if path.exists() {
            Self::load_from(path)?
        } else {
            Self::default()
        };
        config.with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            CuratorError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(dir) = env_path(constants::ENV_DATA_DIR)? {
            self.paths.data_dir = dir;
        }
        if let Some(dir) = env_path(constants::ENV_LOG_DIR)? {
            self.logging.dir = dir;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.labels.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CuratorError::Config(format!(
                "labels.low_confidence_threshold must be within 0.0..=1.0, got {}",
                threshold
            )));
        }
        Ok(())
    }
}

fn env_path(key: &str) -> Result<Option<PathBuf>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(Some(PathBuf::from(value))),
        Ok(_) | Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
