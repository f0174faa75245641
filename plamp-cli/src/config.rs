//! Configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlampConfig {
    /// How results are printed
    #[serde(default)]
    pub output: OutputConfig,

    /// Semantic checking options
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `text` or `json`
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Colorize text output
    #[serde(default = "default_true")]
    pub color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Host descriptions file, relative paths are resolved against the
    /// working directory
    #[serde(default)]
    pub externals: Option<PathBuf>,

    /// Fail `check` when warnings are reported
    #[serde(default)]
    pub warnings_as_errors: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            color: default_true(),
        }
    }
}

impl PlampConfig {
    /// Load configuration from file
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_owned(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: PlampConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self, config_path: Option<&Path>) -> Result<()> {
        let config_path = match config_path {
            Some(path) => path.to_owned(),
            None => Self::default_config_path()?,
        };

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path
    fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;

        Ok(config_dir.join("plamp").join("config.toml"))
    }
}

fn default_output_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization() {
        let config = PlampConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: PlampConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlampConfig = toml::from_str("[check]\nwarnings_as_errors = true\n").unwrap();
        assert!(config.check.warnings_as_errors);
        assert_eq!(config.output.format, "text");
        assert!(config.output.color);
        assert_eq!(config.check.externals, None);
    }

    #[test]
    fn test_config_load_save() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = PlampConfig::default();
        config.output.format = "json".to_string();
        config.check.externals = Some(PathBuf::from("host.toml"));
        config.save(Some(&config_path)).unwrap();

        let loaded = PlampConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = PlampConfig::load(Some(&temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, PlampConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "output = 3").unwrap();
        assert!(PlampConfig::load(Some(&config_path)).is_err());
    }
}
