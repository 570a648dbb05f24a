use crate::domain::builder::MalformedPolicy;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry constants copied into every node. They carry no meaning for the
/// graph itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Row height per attribute.
    pub item_height: f64,
    pub node_width: f64,
    /// Tier assigned to tables without a grid position.
    pub max_level: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_height: 30.0,
            node_width: 200.0,
            max_level: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub malformed_policy: MalformedPolicy,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"layout": {"itemHeight": 24}, "malformedPolicy": "fail_fast"}"#)
                .unwrap();
        assert_eq!(config.layout.item_height, 24.0);
        assert_eq!(config.layout.node_width, 200.0);
        assert_eq!(config.layout.max_level, 5);
        assert_eq!(config.malformed_policy, MalformedPolicy::FailFast);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"layout": {{"maxLevel": 8}}}}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.layout.max_level, 8);
        assert_eq!(config.malformed_policy, MalformedPolicy::Skip);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load(Path::new("/nonexistent/lineage.json")).is_err());
    }
}
