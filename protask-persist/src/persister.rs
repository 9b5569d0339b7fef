//! Persistence subscriber.
//!
//! A [`Persister`] listens to a board's change channel and writes every
//! accepted snapshot under one storage key. The board never calls it
//! directly.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use protask_core::{BoardConfig, Change, Snapshot};

use crate::error::PersistError;
use crate::storage::{self, WriteResult};

#[derive(Debug, Clone)]
pub struct Persister {
    home: PathBuf,
    key: String,
}

impl Persister {
    pub fn new(home: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            key: key.into(),
        }
    }

    pub fn from_config(home: &Path, config: &BoardConfig) -> Self {
        Self::new(home, config.storage_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn record_path(&self) -> PathBuf {
        storage::record_path_at(&self.home, &self.key)
    }

    /// Persisted board, or `None` before the first save.
    pub fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        Ok(storage::load_at(&self.home, &self.key)?.map(|record| record.state))
    }

    /// Write the snapshot carried by one change.
    pub fn handle(&self, change: &Change) -> Result<WriteResult, PersistError> {
        tracing::debug!("persisting after {:?}", change.action);
        storage::save_at(&self.home, &self.key, &change.snapshot, change.id_watermark)
    }

    /// Write every change waiting on `rx`, oldest first. Does not block.
    pub fn drain(&self, rx: &Receiver<Change>) -> Result<Vec<WriteResult>, PersistError> {
        rx.try_iter().map(|change| self.handle(&change)).collect()
    }
}
