//! Application configuration (`canopy.toml`).
//!
//! ```toml
//! [core.scope]
//! zone_type = "Zone"
//!
//! [core.logging]
//! level = "debug"
//!
//! [script]
//! relink_on_rebuild = true
//! ```

use anyhow::Context;
use canopy_core::{CoreConfig, Tree};
use canopy_script::{ScriptConfig, ScriptEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub core: CoreConfig,
    pub script: ScriptConfig,
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.core.validate()
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Empty tree using the core settings.
    pub fn tree(&self) -> Tree {
        Tree::with_config(self.core.clone())
    }

    /// Script engine with the built-in compiler.
    pub fn engine(&self) -> ScriptEngine {
        ScriptEngine::new(canopy_script::ComponentCompiler, self.script.clone())
    }
}
