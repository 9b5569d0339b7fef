pub mod add;
pub mod delete;
pub mod drag;
pub mod replay;
pub mod reset;
pub mod show;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::{Context, Result};

use protask_core::{Board, BoardConfig, Change, Outcome};
use protask_persist::{load_or_seed_at, Persister, WriteResult};

/// The board as stored under one home directory, with its persister
/// subscribed.
pub struct Session {
    pub home: PathBuf,
    pub config: BoardConfig,
    pub board: Board,
    pub persister: Persister,
    changes: Receiver<Change>,
}

impl Session {
    pub fn open() -> Result<Self> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        Self::open_at(&home)
    }

    pub fn open_at(home: &Path) -> Result<Self> {
        let config = BoardConfig::load_at(home).context("failed to load config")?;
        let record = load_or_seed_at(home, &config)
            .with_context(|| format!("failed to load board '{}'", config.storage_key))?;
        let ids = config.id_scheme.resume(record.next_id, &record.state.tasks);
        let mut board =
            Board::with_ids(record.state, ids).context("stored board is inconsistent")?;
        let changes = board.subscribe();
        let persister = Persister::from_config(home, &config);
        Ok(Self {
            home: home.to_path_buf(),
            config,
            board,
            persister,
            changes,
        })
    }

    /// Write every change accepted since the last flush.
    pub fn flush(&self) -> Result<Vec<WriteResult>> {
        self.persister
            .drain(&self.changes)
            .with_context(|| format!("failed to save '{}'", self.persister.record_path().display()))
    }
}

pub fn print_outcome(what: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Applied(_) => println!("✓ {what}"),
        Outcome::Ignored(reason) => println!("· {what}: nothing to do ({reason})"),
    }
}
