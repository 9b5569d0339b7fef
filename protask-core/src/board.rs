//! Board state container: apply-and-notify.
//!
//! [`Board`] holds the current [`Snapshot`] behind an `Arc`. Every accepted
//! mutation builds a new snapshot through the [`store`](crate::store)
//! functions and swaps the `Arc`, so a reader holding an older snapshot
//! keeps a consistent view. Each accepted mutation is published as a
//! [`Change`] to every channel handed out by [`Board::subscribe`].
//!
//! Nothing is published for ignored or rejected operations.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::ids::{IdGenerator, TimestampIds};
use crate::resolver::{resolve, IgnoreReason, Intent, Resolution};
use crate::store::{self, MoveTarget};
use crate::types::{ColumnId, DragEntity, Snapshot, TaskId};

/// What caused a change. Carried on every [`Change`] for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    MoveColumn {
        from: ColumnId,
        to: ColumnId,
    },
    MoveTask {
        task: TaskId,
        target: MoveTarget,
    },
    AddTask {
        id: TaskId,
        title: String,
        column: ColumnId,
    },
    DeleteTask {
        id: TaskId,
    },
    /// Whole-board load or reset.
    Replace,
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::ReorderColumn { from, to } => Action::MoveColumn { from, to },
            Intent::MoveTask { task, target } => Action::MoveTask { task, target },
        }
    }
}

/// One accepted mutation and the state it produced.
#[derive(Debug, Clone)]
pub struct Change {
    pub action: Action,
    pub snapshot: Arc<Snapshot>,
    /// Id counter to store alongside the snapshot, see
    /// [`IdGenerator::watermark`].
    pub id_watermark: Option<u64>,
}

/// Result of a board operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; this is the new snapshot.
    Applied(Arc<Snapshot>),
    /// No state change.
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

pub struct Board {
    snapshot: Arc<Snapshot>,
    ids: Box<dyn IdGenerator>,
    subscribers: Vec<Sender<Change>>,
    gesture: Option<DragEntity>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("snapshot", &self.snapshot)
            .field("subscribers", &self.subscribers.len())
            .field("gesture", &self.gesture)
            .finish()
    }
}

impl Board {
    /// Build a board over a validated snapshot with timestamp ids.
    pub fn new(snapshot: Snapshot) -> Result<Self, BoardError> {
        Self::with_ids(snapshot, Box::new(TimestampIds::new()))
    }

    pub fn with_ids(snapshot: Snapshot, ids: Box<dyn IdGenerator>) -> Result<Self, BoardError> {
        snapshot.validate()?;
        Ok(Self {
            snapshot: Arc::new(snapshot),
            ids,
            subscribers: Vec::new(),
            gesture: None,
        })
    }

    /// Current state.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn id_watermark(&self) -> Option<u64> {
        self.ids.watermark()
    }

    /// Receive a [`Change`] for every accepted mutation from now on.
    pub fn subscribe(&mut self) -> Receiver<Change> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Apply a resolved intent.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome, BoardError> {
        let next = match transition(&self.snapshot, &intent) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!("rejected {intent:?}: {err}");
                return Err(err);
            }
        };
        Ok(self.commit(Action::from(intent), next))
    }

    pub fn move_column(&mut self, from: ColumnId, to: ColumnId) -> Result<Outcome, BoardError> {
        self.apply(Intent::ReorderColumn { from, to })
    }

    pub fn move_task(&mut self, task: TaskId, target: MoveTarget) -> Result<Outcome, BoardError> {
        self.apply(Intent::MoveTask { task, target })
    }

    /// Create a task at the end of the flat sequence and return its id.
    ///
    /// The column is checked before anything changes.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        column: ColumnId,
    ) -> Result<TaskId, BoardError> {
        let title = title.into();
        let current = &self.snapshot;
        if !current.has_column(&column) {
            let err = BoardError::InvalidReference {
                entity: crate::error::Entity::Column,
                id: column.0.clone(),
            };
            tracing::warn!("rejected add_task: {err}");
            return Err(err);
        }

        let id = self.ids.next_task_id(&current.tasks);
        let tasks = store::add_task(&current.columns, &current.tasks, id.clone(), title.clone(), &column)?;
        let next = Snapshot::new(current.columns.clone(), tasks);
        self.commit(
            Action::AddTask {
                id: id.clone(),
                title,
                column,
            },
            next,
        );
        Ok(id)
    }

    /// Delete a task permanently. Ignored if absent.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Outcome, BoardError> {
        let tasks = store::delete_task(&self.snapshot.tasks, &id);
        let next = Snapshot::new(self.snapshot.columns.clone(), tasks);
        Ok(self.commit(Action::DeleteTask { id }, next))
    }

    /// Swap in a whole snapshot (load, reset). Validated first.
    pub fn replace(&mut self, snapshot: Snapshot) -> Result<Outcome, BoardError> {
        snapshot.validate()?;
        Ok(self.commit(Action::Replace, snapshot))
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// What the board would look like if the gesture ended here.
    ///
    /// Computed against the committed state; nothing is stored or published.
    pub fn preview(&self, active: &DragEntity, over: Option<&DragEntity>) -> Arc<Snapshot> {
        match resolve(active, over) {
            Resolution::Intent(intent) => match transition(&self.snapshot, &intent) {
                Ok(next) if next != *self.snapshot => Arc::new(next),
                _ => self.snapshot(),
            },
            Resolution::Ignored(_) => self.snapshot(),
        }
    }

    pub fn drag_start(&mut self, active: DragEntity) {
        if let Some(stale) = self.gesture.replace(active) {
            tracing::warn!("drag start while '{}' was still active; dropping it", stale.id);
        }
    }

    /// Live preview for a pointer-over change. `None` outside a gesture.
    pub fn drag_over(
        &self,
        active: &DragEntity,
        over: Option<&DragEntity>,
    ) -> Option<Arc<Snapshot>> {
        self.gesture.as_ref()?;
        Some(self.preview(active, over))
    }

    /// Commit a gesture.
    ///
    /// Classifies the end event on its own; any preview shown during the
    /// gesture is not consulted.
    pub fn drag_end(
        &mut self,
        active: &DragEntity,
        over: Option<&DragEntity>,
    ) -> Result<Outcome, BoardError> {
        self.gesture = None;
        match resolve(active, over) {
            Resolution::Intent(intent) => self.apply(intent),
            Resolution::Ignored(reason) => {
                tracing::debug!("gesture on '{}' ignored: {reason}", active.id);
                Ok(Outcome::Ignored(reason))
            }
        }
    }

    /// Terminal event for a lost gesture. Same as ending with no target; a
    /// stray cancel outside any gesture reports `NoGesture`.
    pub fn drag_cancel(&mut self) -> Outcome {
        match self.gesture.take() {
            Some(_) => Outcome::Ignored(IgnoreReason::NoTarget),
            None => Outcome::Ignored(IgnoreReason::NoGesture),
        }
    }

    pub fn gesture(&self) -> Option<&DragEntity> {
        self.gesture.as_ref()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn commit(&mut self, action: Action, next: Snapshot) -> Outcome {
        if next == *self.snapshot {
            tracing::debug!("{action:?} left the board unchanged");
            return Outcome::Ignored(IgnoreReason::Unchanged);
        }
        let snapshot = Arc::new(next);
        self.snapshot = Arc::clone(&snapshot);
        tracing::debug!("applied {action:?}");

        let change = Change {
            action,
            snapshot: Arc::clone(&snapshot),
            id_watermark: self.ids.watermark(),
        };
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        Outcome::Applied(snapshot)
    }
}

/// Next state for an intent. Only the touched sequence is rebuilt.
fn transition(current: &Snapshot, intent: &Intent) -> Result<Snapshot, BoardError> {
    match intent {
        Intent::ReorderColumn { from, to } => Ok(Snapshot::new(
            store::move_column(&current.columns, from, to),
            current.tasks.clone(),
        )),
        Intent::MoveTask { task, target } => Ok(Snapshot::new(
            current.columns.clone(),
            store::move_task(&current.columns, &current.tasks, task, target)?,
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
