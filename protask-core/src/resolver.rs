//! Drag intent resolver.
//!
//! Turns a raw drag event (active element, element under the pointer) into
//! at most one store call. Classification is total: anything it does not
//! recognize resolves to [`Resolution::Ignored`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::store::MoveTarget;
use crate::types::{ColumnId, DragEntity, EntityKind, TaskId};

/// A classified gesture, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    ReorderColumn { from: ColumnId, to: ColumnId },
    MoveTask { task: TaskId, target: MoveTarget },
}

/// Why a gesture or operation produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Dropped outside any target.
    NoTarget,
    /// Dropped on itself.
    DroppedOnSelf,
    /// Event shape not understood.
    Unrecognized,
    /// The operation resolved to the current state.
    Unchanged,
    /// Cancel arrived with no gesture in progress.
    NoGesture,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::NoTarget => "dropped outside any target",
            IgnoreReason::DroppedOnSelf => "dropped on itself",
            IgnoreReason::Unrecognized => "unrecognized drag event",
            IgnoreReason::Unchanged => "nothing changed",
            IgnoreReason::NoGesture => "no gesture in progress",
        };
        f.write_str(text)
    }
}

/// Result of classifying one drag event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Intent(Intent),
    Ignored(IgnoreReason),
}

/// Classify a drag event. First matching rule wins.
pub fn resolve(active: &DragEntity, over: Option<&DragEntity>) -> Resolution {
    let Some(over) = over else {
        return Resolution::Ignored(IgnoreReason::NoTarget);
    };
    if active.id == over.id {
        return Resolution::Ignored(IgnoreReason::DroppedOnSelf);
    }

    match (active.kind, over.kind) {
        // The column drop zone is not required; a non-column `to` is a
        // store no-op.
        (EntityKind::Column, _) => Resolution::Intent(Intent::ReorderColumn {
            from: ColumnId::from(active.id.as_str()),
            to: ColumnId::from(over.id.as_str()),
        }),
        (EntityKind::Task, EntityKind::Task) => Resolution::Intent(Intent::MoveTask {
            task: TaskId::from(active.id.as_str()),
            target: MoveTarget::on_task(over.id.as_str()),
        }),
        (EntityKind::Task, EntityKind::Column) => Resolution::Intent(Intent::MoveTask {
            task: TaskId::from(active.id.as_str()),
            target: MoveTarget::on_column(over.id.as_str()),
        }),
        _ => Resolution::Ignored(IgnoreReason::Unrecognized),
    }
}
