//! ProTask core library: board types, reorder/move engine, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes, columns, tasks, snapshots, drag entities
//! - [`store`]: pure move/insert/delete over the ordered sequences
//! - [`resolver`]: drag event → [`Intent`] classification
//! - [`board`]: [`Board`] state container with change notification
//! - [`gesture`]: gesture events and gesture scripts
//! - [`config`]: `~/.protask/config.yaml`
//! - [`error`]: [`BoardError`], [`ConfigError`]

pub mod board;
pub mod config;
pub mod error;
pub mod gesture;
pub mod ids;
pub mod resolver;
pub mod seed;
pub mod store;
pub mod types;

pub use board::{Action, Board, Change, Outcome};
pub use config::BoardConfig;
pub use error::{BoardError, ConfigError, Entity};
pub use gesture::{GestureEvent, GestureStep};
pub use ids::{IdGenerator, IdScheme, SequentialIds, TimestampIds};
pub use resolver::{resolve, IgnoreReason, Intent, Resolution};
pub use store::MoveTarget;
pub use types::{Column, ColumnId, DragEntity, EntityKind, Snapshot, Task, TaskId};
