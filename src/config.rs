//! Store configuration
//!
//! Read from `config.yaml` in the store directory. Every field is optional;
//! a missing file means defaults.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.yaml";

/// What `reorder` does with tasks the new order leaves out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPolicy {
    /// Keep them after the listed tasks, in their previous relative order
    #[default]
    Append,
    /// Drop them from the collection
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key holding the serialized collection
    pub tasks_key: String,

    /// Key recording that first-run seeding already happened
    pub visited_key: String,

    /// Install the sample tasks on a first-ever run
    pub seed_samples: bool,

    pub reorder_policy: ReorderPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_key: "todos".to_string(),
            visited_key: "hasVisited".to_string(),
            seed_samples: true,
            reorder_policy: ReorderPolicy::default(),
        }
    }
}

impl Config {
    /// Load `config.yaml` from `dir`, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.tasks_key, "todos");
        assert_eq!(config.visited_key, "hasVisited");
        assert!(config.seed_samples);
        assert_eq!(config.reorder_policy, ReorderPolicy::Append);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "seed_samples: false\nreorder_policy: discard\n",
        )
        .unwrap();

        let config = Config::load(temp.path()).unwrap();
        assert!(!config.seed_samples);
        assert_eq!(config.reorder_policy, ReorderPolicy::Discard);
        assert_eq!(config.tasks_key, "todos");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "reorder_policy: sideways\n").unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("config.yaml"));
    }
}
