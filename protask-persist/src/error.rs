//! Error types for protask-persist.

use std::path::PathBuf;

use thiserror::Error;

use protask_core::{BoardError, ConfigError};

/// All errors that can arise while loading or saving the board record.
#[derive(Debug, Error)]
pub enum PersistError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error on save.
    #[error("record JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load, with the offending file.
    #[error("failed to parse board record at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The record parsed but breaks a board invariant.
    #[error("board record at {path} is invalid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: BoardError,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience constructor for [`PersistError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.into(),
        source,
    }
}
