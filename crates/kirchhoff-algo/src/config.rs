//! Pipeline configuration.
//!
//! Stored as TOML. Partial files are accepted; anything unspecified keeps
//! its default.
//!
//! ```toml
//! [assembly]
//! diagonal_term = 1.0
//!
//! [diagnostics]
//! enabled = true
//! ```

use std::path::Path;

use kirchhoff_core::{CircuitError, CircuitResult};
use serde::{Deserialize, Serialize};

/// Configuration for [`Circuit`](crate::Circuit).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Equation assembly settings.
    pub assembly: AssemblyConfig,

    /// Diagnostics collection settings.
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Constant added to every diagonal entry of the left matrix.
    pub diagonal_term: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self { diagonal_term: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Collect warnings on every update.
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl CircuitConfig {
    pub fn from_toml_str(contents: &str) -> CircuitResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| CircuitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: impl AsRef<Path>) -> CircuitResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> CircuitResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| CircuitError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn validate(&self) -> CircuitResult<()> {
        if !self.assembly.diagonal_term.is_finite() {
            return Err(CircuitError::Config(format!(
                "assembly.diagonal_term must be finite, got {}",
                self.assembly.diagonal_term
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CircuitConfig::default();
        assert_eq!(config.assembly.diagonal_term, 1.0);
        assert!(config.diagnostics.enabled);
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [diagnostics]
            enabled = false
        "#;

        let config = CircuitConfig::from_toml_str(toml).unwrap();
        assert!(!config.diagnostics.enabled);
        assert_eq!(config.assembly.diagonal_term, 1.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CircuitConfig::from_toml_str("[assembly]\ndiagonal_term = \"one\"").unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_non_finite_diagonal_is_rejected() {
        let err = CircuitConfig::from_toml_str("[assembly]\ndiagonal_term = nan").unwrap_err();
        assert!(matches!(err, CircuitError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();

        let mut config = CircuitConfig::default();
        config.assembly.diagonal_term = 0.5;
        config.save_to(file.path()).unwrap();

        let loaded = CircuitConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CircuitConfig::load_from("/nonexistent/kirchhoff.toml").unwrap_err();
        assert!(matches!(err, CircuitError::Io(_)));
    }
}
