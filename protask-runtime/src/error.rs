use thiserror::Error;

/// Error surface for the board runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("board error: {0}")]
    Board(#[from] protask_core::BoardError),

    #[error("persist error: {0}")]
    Persist(#[from] protask_persist::PersistError),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
