//! Board configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.protask/
//!   config.yaml              (optional: defaults apply when absent)
//!   <storage_key>.json       (persisted board, see protask-persist)
//! ```
//!
//! # API pattern
//!
//! Every filesystem function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::IdScheme;

/// Namespaced record name used when no config overrides it.
pub const DEFAULT_STORAGE_KEY: &str = "protask-storage";

/// Contents of `~/.protask/config.yaml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Name of the persisted record under `~/.protask/`.
    pub storage_key: String,
    /// Seed the starter tasks on first run and on reset.
    pub seed_tasks: bool,
    pub id_scheme: IdScheme,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_tasks: true,
            id_scheme: IdScheme::default(),
        }
    }
}

/// `<home>/.protask/`
pub fn protask_root(home: &Path) -> PathBuf {
    home.join(".protask")
}

/// `<home>/.protask/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    protask_root(home).join("config.yaml")
}

impl BoardConfig {
    /// Load the config, falling back to defaults when the file is absent.
    ///
    /// Returns `ConfigError::Parse` (with path + line context) if malformed YAML.
    pub fn load_at(home: &Path) -> Result<Self, ConfigError> {
        let path = config_path_at(home);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
    }

    /// `load_at` convenience wrapper.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(&home()?)
    }
}

/// Home directory as reported by the OS.
pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(home: &Path, body: &str) {
        let root = protask_root(home);
        std::fs::create_dir_all(&root).expect("mkdir");
        std::fs::write(config_path_at(home), body).expect("write");
    }

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().expect("tempdir");
        assert!(config_path_at(home.path()).ends_with(".protask/config.yaml"));
    }

    #[test]
    fn missing_config_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let config = BoardConfig::load_at(home.path()).expect("load");
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.storage_key, "protask-storage");
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let home = TempDir::new().expect("tempdir");
        write_config(home.path(), "storage_key: work-board\n");
        let config = BoardConfig::load_at(home.path()).expect("load");
        assert_eq!(config.storage_key, "work-board");
        assert!(config.seed_tasks);
        assert_eq!(config.id_scheme, IdScheme::Timestamp);
    }

    #[test]
    fn full_config_parses() {
        let home = TempDir::new().expect("tempdir");
        write_config(
            home.path(),
            "storage_key: demo\nseed_tasks: false\nid_scheme: sequential\n",
        );
        let config = BoardConfig::load_at(home.path()).expect("load");
        assert!(!config.seed_tasks);
        assert_eq!(config.id_scheme, IdScheme::Sequential);
    }

    #[test]
    fn malformed_config_reports_path() {
        let home = TempDir::new().expect("tempdir");
        write_config(home.path(), "seed_tasks: [unclosed\n");
        let err = BoardConfig::load_at(home.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
