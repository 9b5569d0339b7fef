//! `protask drag <active> [<over>] [--preview]`

use anyhow::{Context, Result};
use clap::Args;

use protask_core::{resolve, DragEntity, Resolution};

use super::{print_outcome, show, Session};
use crate::EntityArg;

/// One complete drag gesture.
#[derive(Args, Debug)]
pub struct DragArgs {
    /// Dragged entity, `task:<id>` or `column:<id>`.
    pub active: EntityArg,

    /// Entity under the pointer on release. Omit to drop outside any target.
    pub over: Option<EntityArg>,

    /// Print the board as it would look after the drop and write nothing.
    #[arg(long)]
    pub preview: bool,
}

impl DragArgs {
    pub fn run(self) -> Result<()> {
        let mut session = Session::open()?;
        let label = match &self.over {
            Some(over) => format!("{} onto {over}", self.active),
            None => format!("{} onto nothing", self.active),
        };
        let active: DragEntity = self.active.into();
        let over: Option<DragEntity> = self.over.map(Into::into);

        if self.preview {
            if let Resolution::Ignored(reason) = resolve(&active, over.as_ref()) {
                println!("· Preview {label}: nothing to do ({reason})");
            }
            show::print_board(&session.board.preview(&active, over.as_ref()));
            return Ok(());
        }

        session.board.drag_start(active.clone());
        let outcome = session
            .board
            .drag_end(&active, over.as_ref())
            .with_context(|| format!("failed to drag {label}"))?;
        session.flush()?;
        print_outcome(&format!("Dragged {label}"), &outcome);
        Ok(())
    }
}
