//! Loader configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! is a valid configuration:
//!
//! ```yaml
//! data_dir: data
//! delimiter: ","
//! preview_rows: 5
//! snapshot:
//!   path: data/cv.snapshot
//!   compress: true
//! ```

use crate::loader::DelimitedDirectory;
use crate::persistence::SnapshotOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The table delimiter must be a single ASCII character
    #[error("Invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(char),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<table>.csv` files
    pub data_dir: PathBuf,
    pub delimiter: char,
    /// Entities of each collection logged after a raw load
    pub preview_rows: usize,
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: PathBuf,
    pub compress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            delimiter: ',',
            preview_rows: 5,
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/cv.snapshot"),
            compress: true,
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn delimiter_byte(&self) -> ConfigResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidDelimiter(self.delimiter))
        }
    }

    /// Table source for the configured data directory
    pub fn source(&self) -> ConfigResult<DelimitedDirectory> {
        Ok(DelimitedDirectory::new(&self.data_dir).with_delimiter(self.delimiter_byte()?))
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            compress: self.snapshot.compress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert_eq!(config.preview_rows, 5);
        assert!(config.snapshot_options().compress);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml_str("delimiter: \"\\t\"\nsnapshot:\n  compress: false\n").unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');
        assert!(!config.snapshot.compress);
        assert_eq!(config.snapshot.path, PathBuf::from("data/cv.snapshot"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = Config::default();
        config.preview_rows = 2;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = Config::from_yaml_str("delimiter: \"§\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelimiter('§')));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Config::from_yaml_str("\n").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            Config::from_yaml_str("preview_rows: many\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_yaml_file("/nonexistent/careervillage.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
