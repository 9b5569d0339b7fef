//! `protask reset [--empty]`

use anyhow::{Context, Result};
use clap::Args;

use protask_core::{Outcome, Snapshot};
use protask_persist::save_at;

use super::{print_outcome, Session};

/// Replace the board with the starter board.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Keep the starter columns but no tasks.
    #[arg(long)]
    pub empty: bool,
}

impl ResetArgs {
    pub fn run(self) -> Result<()> {
        let mut session = Session::open()?;
        let outcome = session
            .board
            .replace(Snapshot::seeded(session.config.seed_tasks && !self.empty))
            .context("failed to reset board")?;
        session.flush()?;

        // A never-saved board already equals the seed; write it anyway.
        if let Outcome::Ignored(_) = outcome {
            save_at(
                &session.home,
                &session.config.storage_key,
                &session.board.snapshot(),
                session.board.id_watermark(),
            )
            .context("failed to save board")?;
        }
        print_outcome("Reset board", &outcome);
        Ok(())
    }
}
