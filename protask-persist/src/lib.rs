//! # protask-persist
//!
//! Durable storage for the board.
//!
//! The board record lives at `~/.protask/<storage_key>.json` and is written
//! with hash-gated atomic writes ([`storage::save_at`]). A [`Persister`]
//! subscribes to a board's change channel and saves after every accepted
//! mutation.

pub mod error;
pub mod persister;
pub mod storage;

pub use error::PersistError;
pub use persister::Persister;
pub use storage::{load_at, load_or_seed_at, save_at, Record, WriteResult};
