//! `protask delete <task-id>`

use anyhow::{Context, Result};
use clap::Args;

use protask_core::TaskId;

use super::{print_outcome, Session};

/// Delete a task. Deleting an unknown id changes nothing.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the task to delete.
    pub id: String,
}

impl DeleteArgs {
    pub fn run(self) -> Result<()> {
        let mut session = Session::open()?;
        let id = TaskId::from(self.id);
        let outcome = session
            .board
            .delete_task(id.clone())
            .with_context(|| format!("failed to delete '{id}'"))?;
        session.flush()?;
        print_outcome(&format!("Deleted '{id}'"), &outcome);
        Ok(())
    }
}
