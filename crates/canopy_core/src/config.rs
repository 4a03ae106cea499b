//! Configuration for the composition tree.
//!
//! Maps to the `[core]` table of `canopy.toml`. Every field has a default, so
//! a partial (or missing) table is valid.
//!
//! ## Example
//!
//! ```toml
//! [scope]
//! root_type = "Simulations"
//! simulation_type = "Simulation"
//! zone_type = "Zone"
//!
//! [mutation]
//! parent_before_placement = false
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Type names the scope resolver treats as boundaries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScopeConfig {
    /// Top-level container; also the `.Name` re-rooting prefix of paths.
    pub root_type: String,
    /// Children of the root with this type never leak into a sibling's scope.
    pub simulation_type: String,
    pub zone_type: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            root_type: "Simulations".to_string(),
            simulation_type: "Simulation".to_string(),
            zone_type: "Zone".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MutationConfig {
    /// Assign the child's parent before scanning for a slot, leaving it set
    /// when no slot is found.
    pub parent_before_placement: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CoreConfig {
    pub scope: ScopeConfig,
    pub mutation: MutationConfig,
    pub logging: LoggingConfig,
}

impl CoreConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Boundary type names must be non-empty and must not contain `.` or brackets
    /// - The root and zone types must differ
    /// - The log level must be one of trace, debug, info, warn, error
    pub fn validate(&self) -> anyhow::Result<()> {
        for (label, name) in [
            ("root_type", &self.scope.root_type),
            ("simulation_type", &self.scope.simulation_type),
            ("zone_type", &self.scope.zone_type),
        ] {
            anyhow::ensure!(!name.is_empty(), "scope.{label} must not be empty");
            anyhow::ensure!(
                !name.contains(['.', '[', ']']),
                "scope.{label} must be a plain type name, got '{name}'"
            );
        }
        anyhow::ensure!(
            self.scope.root_type != self.scope.zone_type,
            "scope.root_type and scope.zone_type must differ"
        );
        anyhow::ensure!(
            self.logging.level.parse::<tracing::Level>().is_ok(),
            "logging.level '{}' is not a valid level",
            self.logging.level
        );
        Ok(())
    }

    /// Path prefix that re-roots traversal at the top-level container.
    pub fn root_prefix(&self) -> String {
        format!(".{}", self.scope.root_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.root_prefix(), ".Simulations");
        assert!(!config.mutation.parent_before_placement);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CoreConfig::from_toml_str(
            r#"
            [mutation]
            parent_before_placement = true
            "#,
        )
        .unwrap();
        assert!(config.mutation.parent_before_placement);
        assert_eq!(config.scope.zone_type, "Zone");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(CoreConfig::from_toml_str("[logging]\nlevel = \"loud\"").is_err());
        assert!(CoreConfig::from_toml_str("[scope]\nzone_type = \"\"").is_err());
        assert!(CoreConfig::from_toml_str("[scope]\nroot_type = \"A.B\"").is_err());
        assert!(CoreConfig::from_toml_str("[scope]\nroot_type = \"Zone\"").is_err());
    }
}
