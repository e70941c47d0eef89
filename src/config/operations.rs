//! Config loading and validation.

use super::model::Config;
use crate::error::{Result, WrapError};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file given with `--config`
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(WrapError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            WrapError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| WrapError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `program`, when set, must be non-empty and contain no NUL bytes
    pub fn validate(&self) -> Result<()> {
        if let Some(program) = &self.program {
            if program.is_empty() {
                return Err(WrapError::Config(
                    "config validation failed: program must not be empty".to_string(),
                ));
            }
            if program.contains('\0') {
                return Err(WrapError::Config(
                    "config validation failed: program must not contain NUL bytes".to_string(),
                ));
            }
        }

        Ok(())
    }
}
