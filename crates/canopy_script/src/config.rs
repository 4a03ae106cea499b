//! Script hosting configuration (`[script]` table of `canopy.toml`).

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Re-run link resolution on the new instance after a rebuild.
    pub relink_on_rebuild: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            relink_on_rebuild: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_relinks() {
        assert!(ScriptConfig::default().relink_on_rebuild);
    }

    #[test]
    fn test_empty_table_is_default() {
        let config: ScriptConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScriptConfig::default());
    }
}
