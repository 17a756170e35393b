//! Configuration loaded from `scaffold.toml`.
//!
//! ```toml
//! [generate]
//! target = "factory"
//! migration = true
//! force = false
//!
//! [schema]
//! search_root = "db"
//! ```
//!
//! Lookup order: `./scaffold.toml`, then
//! `<config dir>/schema-to-scaffold/config.toml`. Missing files fall back to
//! [`Config::default`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::renderer::ScriptOptions;

pub const CONFIG_FILE: &str = "scaffold.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default generation flags.
    pub generate: ScriptOptions,
    pub schema: SchemaConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Directory where schema discovery starts.
    pub search_root: PathBuf,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            search_root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load from the first config file found, or defaults.
    pub fn load() -> ScaffoldResult<Self> {
        let candidates = [
            Some(PathBuf::from(CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("schema-to-scaffold").join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load from an explicit path.
    pub fn from_file(path: &Path) -> ScaffoldResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ScaffoldError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| ScaffoldError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Target;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generate.target, Target::Scaffold);
        assert!(!config.generate.migration);
        assert_eq!(config.schema.search_root, PathBuf::from("."));
    }

    #[test]
    fn test_partial_generate_section() {
        let config = Config::from_toml("[generate]\ntarget = \"factory\"\nforce = true\n").unwrap();
        assert_eq!(config.generate.target, Target::Factory);
        assert!(config.generate.force);
        assert!(!config.generate.migration);
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(Config::from_toml("[generate]\ntarget = \"model\"\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[schema]\nsearch_root = \"db\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schema.search_root, PathBuf::from("db"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[generate\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ScaffoldError::Config(_))));
    }
}
