//! Starter board.

use crate::types::{Column, Snapshot, Task};

pub fn starter_columns() -> Vec<Column> {
    vec![
        Column::new("todo", "To Do"),
        Column::new("inprogress", "In Progress"),
        Column::new("done", "Done"),
    ]
}

pub fn starter_tasks() -> Vec<Task> {
    vec![
        Task::new("task-1", "Setup project repository", "todo"),
        Task::new("task-2", "Develop core components", "todo"),
        Task::new("task-3", "Implement drag and drop", "inprogress"),
        Task::new("task-4", "Refine UI/UX", "inprogress"),
        Task::new("task-5", "Add state persistence", "done"),
    ]
}

impl Snapshot {
    /// Starter columns, with or without the starter tasks.
    pub fn seeded(with_tasks: bool) -> Self {
        let tasks = if with_tasks { starter_tasks() } else { Vec::new() };
        Snapshot::new(starter_columns(), tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_board_is_valid() {
        Snapshot::seeded(true).validate().expect("valid");
        Snapshot::seeded(false).validate().expect("valid");
    }

    #[test]
    fn empty_seed_keeps_columns() {
        let snapshot = Snapshot::seeded(false);
        assert_eq!(snapshot.columns.len(), 3);
        assert!(snapshot.tasks.is_empty());
    }
}
