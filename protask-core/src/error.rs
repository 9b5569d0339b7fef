//! Error types for protask-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which sequence an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Column,
    Task,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Column => write!(f, "column"),
            Entity::Task => write!(f, "task"),
        }
    }
}

/// Errors from board mutations. A failed mutation leaves prior state intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The operation names an id that does not exist.
    #[error("unknown {entity} '{id}'")]
    InvalidReference { entity: Entity, id: String },

    /// The id is already taken in its sequence.
    #[error("duplicate {entity} id '{id}'")]
    DuplicateId { entity: Entity, id: String },
}

/// Errors from loading `~/.protask/config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
