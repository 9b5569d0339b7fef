//! Serialized board runtime: one tokio task owns the board, every caller
//! goes through its mutation queue, and accepted changes are broadcast and
//! persisted.

mod error;
pub mod logging;
mod service;

pub use error::RuntimeError;
pub use logging::{init_json_tracing, init_tracing};
pub use service::{replay, BoardHandle, PersistStats, ReplaySummary, Runtime};
