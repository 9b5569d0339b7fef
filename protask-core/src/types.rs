//! Domain types for the ProTask board.
//!
//! A board is two ordered sequences: columns, and one flat sequence of tasks
//! shared by every column. A task's position inside its column is its
//! relative position among same-column tasks in the flat sequence.
//!
//! All types serialize with serde using the camelCase field names of the
//! persisted record (`columnId`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Entity};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A task card. Belongs to exactly one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub column_id: ColumnId,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        column_id: impl Into<ColumnId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column_id: column_id.into(),
        }
    }
}

/// Complete board state. Replaced wholesale on every accepted mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn new(columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        Self { columns, tasks }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.column(id).is_some()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks of one column in visible order.
    pub fn tasks_in<'a>(&'a self, column: &'a ColumnId) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| &t.column_id == column)
    }

    /// Checks that ids are unique and that every task points at a column.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut seen_columns = std::collections::HashSet::new();
        for column in &self.columns {
            if !seen_columns.insert(&column.id) {
                return Err(BoardError::DuplicateId {
                    entity: Entity::Column,
                    id: column.id.0.clone(),
                });
            }
        }

        let mut seen_tasks = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen_tasks.insert(&task.id) {
                return Err(BoardError::DuplicateId {
                    entity: Entity::Task,
                    id: task.id.0.clone(),
                });
            }
            if !seen_columns.contains(&task.column_id) {
                return Err(BoardError::InvalidReference {
                    entity: Entity::Column,
                    id: task.column_id.0.clone(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Drag entities
// ---------------------------------------------------------------------------

/// What kind of element a drag event refers to.
///
/// Unrecognized `type` strings deserialize to [`EntityKind::Unknown`] so a
/// malformed event degrades to "no intent" instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Column,
    Task,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Column => write!(f, "column"),
            EntityKind::Task => write!(f, "task"),
            EntityKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// One side of a drag event: the active element or the element under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
}

impl DragEntity {
    pub fn column(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Column,
        }
    }

    pub fn task(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Task,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
