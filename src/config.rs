use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    error::{ConfigError, Result},
    video::OutputParams,
};

/// Main configuration for the chroma-compositor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output encoding settings
    pub output: OutputParams,

    /// Job workspace settings
    pub job: JobConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.quality > 100 {
            return Err(ConfigError::InvalidValue {
                key: "output.quality".to_string(),
                value: self.output.quality.to_string(),
            }
            .into());
        }

        if self.output.codec.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.codec".to_string(),
                value: "<empty>".to_string(),
            }
            .into());
        }

        if self.output.audio_codec.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.audio_codec".to_string(),
                value: "<empty>".to_string(),
            }
            .into());
        }

        self.job.validate()
    }
}

/// Job workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Root directory under which per-job working directories are created
    pub root: PathBuf,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("user_data"),
        }
    }
}

impl JobConfig {
    fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "job.root".to_string(),
                value: "<empty>".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let original_config = Config::default();

        // Save and load
        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.output.codec, loaded_config.output.codec);
        assert_eq!(original_config.output.quality, loaded_config.output.quality);
        assert_eq!(original_config.job.root, loaded_config.job.root);
    }

    #[test]
    fn test_invalid_quality() {
        let mut config = Config::default();
        config.output.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_codec_rejected() {
        let mut config = Config::default();
        config.output.codec = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file("does_not_exist.toml").is_err());
    }
}
