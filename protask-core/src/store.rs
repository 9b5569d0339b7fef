//! Ordered collection store.
//!
//! Pure functions over the column and task sequences. Inputs are borrowed
//! and never modified; every call returns a freshly built `Vec`. Calls that
//! change nothing return an equal copy, so callers detect no-ops with `==`.
//!
//! Moves use array-move semantics: the element is removed first, then
//! reinserted at the target's original index. Moving forward therefore lands
//! after the target, moving backward lands before it.

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Entity};
use crate::types::{Column, ColumnId, Task, TaskId};

/// Where a dragged task is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MoveTarget {
    /// Dropped on another task: take its column and its slot.
    OnTask {
        #[serde(rename = "taskId")]
        task_id: TaskId,
    },
    /// Dropped on a column's open area: append after its last task.
    OnColumn {
        #[serde(rename = "columnId")]
        column_id: ColumnId,
    },
}

impl MoveTarget {
    pub fn on_task(id: impl Into<TaskId>) -> Self {
        MoveTarget::OnTask { task_id: id.into() }
    }

    pub fn on_column(id: impl Into<ColumnId>) -> Self {
        MoveTarget::OnColumn {
            column_id: id.into(),
        }
    }
}

/// Relocate column `from` to the slot occupied by `to`.
///
/// Unchanged if `from == to` or either id is absent.
pub fn move_column(columns: &[Column], from: &ColumnId, to: &ColumnId) -> Vec<Column> {
    if from == to {
        return columns.to_vec();
    }
    let old_index = columns.iter().position(|c| &c.id == from);
    let new_index = columns.iter().position(|c| &c.id == to);
    match (old_index, new_index) {
        (Some(old_index), Some(new_index)) => array_move(columns, old_index, new_index),
        _ => columns.to_vec(),
    }
}

/// Move a task onto another task or into a column.
///
/// The column change and the relocation happen in one step. Returns
/// [`BoardError::InvalidReference`] for a drop on an unknown column; an
/// absent task or target task leaves the sequence unchanged.
pub fn move_task(
    columns: &[Column],
    tasks: &[Task],
    task_id: &TaskId,
    target: &MoveTarget,
) -> Result<Vec<Task>, BoardError> {
    if let MoveTarget::OnColumn { column_id } = target {
        if !columns.iter().any(|c| &c.id == column_id) {
            return Err(BoardError::InvalidReference {
                entity: Entity::Column,
                id: column_id.0.clone(),
            });
        }
    }

    let Some(old_index) = tasks.iter().position(|t| &t.id == task_id) else {
        return Ok(tasks.to_vec());
    };

    match target {
        MoveTarget::OnTask { task_id: over_id } => {
            if over_id == task_id {
                return Ok(tasks.to_vec());
            }
            let Some(new_index) = tasks.iter().position(|t| &t.id == over_id) else {
                return Ok(tasks.to_vec());
            };
            let column_id = tasks[new_index].column_id.clone();

            let mut next: Vec<Task> = Vec::with_capacity(tasks.len());
            next.extend(tasks.iter().filter(|t| &t.id != task_id).cloned());
            next.insert(new_index, rehome(&tasks[old_index], column_id));
            Ok(next)
        }
        MoveTarget::OnColumn { column_id } => {
            let mut next: Vec<Task> = Vec::with_capacity(tasks.len());
            next.extend(tasks.iter().filter(|t| &t.id != task_id).cloned());
            let at = next
                .iter()
                .rposition(|t| &t.column_id == column_id)
                .map_or(next.len(), |last| last + 1);
            next.insert(at, rehome(&tasks[old_index], column_id.clone()));
            Ok(next)
        }
    }
}

/// Append a new task to the end of the flat sequence.
///
/// The title is stored as given.
pub fn add_task(
    columns: &[Column],
    tasks: &[Task],
    id: TaskId,
    title: impl Into<String>,
    column_id: &ColumnId,
) -> Result<Vec<Task>, BoardError> {
    if !columns.iter().any(|c| &c.id == column_id) {
        return Err(BoardError::InvalidReference {
            entity: Entity::Column,
            id: column_id.0.clone(),
        });
    }
    if tasks.iter().any(|t| t.id == id) {
        return Err(BoardError::DuplicateId {
            entity: Entity::Task,
            id: id.0,
        });
    }

    let mut next = tasks.to_vec();
    next.push(Task {
        id,
        title: title.into(),
        column_id: column_id.clone(),
    });
    Ok(next)
}

/// Remove a task. Unchanged if absent.
pub fn delete_task(tasks: &[Task], task_id: &TaskId) -> Vec<Task> {
    tasks.iter().filter(|t| &t.id != task_id).cloned().collect()
}

fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    let item = next.remove(from);
    next.insert(to, item);
    next
}

fn rehome(task: &Task, column_id: ColumnId) -> Task {
    Task {
        id: task.id.clone(),
        title: task.title.clone(),
        column_id,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
