//! `protask add <title> --column <id>`

use anyhow::{bail, Context, Result};
use clap::Args;

use protask_core::ColumnId;

use super::Session;

/// Create a task at the end of a column.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title. Stored as given; must not be blank.
    pub title: String,

    /// Column the task goes into (e.g. "todo").
    #[arg(long, short = 'c')]
    pub column: String,
}

impl AddArgs {
    pub fn run(self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("task title must not be blank");
        }
        let mut session = Session::open()?;
        let column = ColumnId::from(self.column);
        let id = session
            .board
            .add_task(self.title.clone(), column.clone())
            .with_context(|| format!("failed to add '{}'", self.title))?;
        session.flush()?;

        println!("✓ Added '{id}' to '{column}'");
        println!("  Saved to: {}", session.persister.record_path().display());
        Ok(())
    }
}
