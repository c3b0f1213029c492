//! Tree configuration.

use crate::error::QuadTreeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Hard ceiling for `max_depth`. Keeps recursion shallow and child bounds
/// well above `f32` resolution.
pub const MAX_DEPTH_LIMIT: u32 = 24;

/// Node capacity and subdivision limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Entries a leaf holds before it splits.
    #[serde(default = "default_max_values")]
    pub max_values: usize,
    /// Deepest level that may still be created by a split. Nodes at this
    /// depth never split and accept any number of entries.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_values: default_max_values(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_values() -> usize {
    32
}
fn default_max_depth() -> u32 {
    8
}

impl TreeConfig {
    pub fn new(max_values: usize, max_depth: u32) -> Self {
        Self { max_values, max_depth }
    }

    /// Check the limits.
    pub fn validate(&self) -> Result<(), QuadTreeError> {
        if self.max_values == 0 {
            return Err(QuadTreeError::InvalidConfig(
                "max_values must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadTreeError::InvalidConfig(format!(
                "max_depth {} exceeds the limit of {}",
                self.max_depth, MAX_DEPTH_LIMIT
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, QuadTreeError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuadTreeError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(
            "Loaded tree config from {:?}: max_values={}, max_depth={}",
            path, config.max_values, config.max_depth
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.max_values, 32);
        assert_eq!(config.max_depth, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TreeConfig::from_toml_str("max_values = 4").unwrap();
        assert_eq!(config, TreeConfig::new(4, 8));

        let config = TreeConfig::from_toml_str("").unwrap();
        assert_eq!(config, TreeConfig::default());
    }

    #[test]
    fn test_rejects_bad_limits() {
        assert!(matches!(
            TreeConfig::from_toml_str("max_values = 0"),
            Err(QuadTreeError::InvalidConfig(_))
        ));
        assert!(matches!(
            TreeConfig::from_toml_str("max_depth = 99"),
            Err(QuadTreeError::InvalidConfig(_))
        ));
        assert!(matches!(
            TreeConfig::from_toml_str("max_depth = \"deep\""),
            Err(QuadTreeError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TreeConfig::load("/nonexistent/quadtree.toml").unwrap_err();
        assert!(matches!(err, QuadTreeError::Io(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TreeConfig::new(16, 6);
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(TreeConfig::from_toml_str(&text).unwrap(), config);
    }
}
