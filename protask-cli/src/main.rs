//! ProTask kanban board CLI.
//!
//! # Usage
//!
//! ```text
//! protask show [--json]
//! protask add <title> --column <id>
//! protask delete <task-id>
//! protask drag <active> [<over>] [--preview]
//! protask replay <script.jsonl> [--json]
//! protask reset [--empty]
//! protask <command> --log-json
//! ```
//!
//! Drag entities are written `task:<id>` or `column:<id>`.

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    add::AddArgs, delete::DeleteArgs, drag::DragArgs, replay::ReplayArgs, reset::ResetArgs,
    show::ShowArgs,
};
use protask_core::{DragEntity, EntityKind};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "protask",
    version,
    about = "Reorder and move tasks on a persisted kanban board",
    long_about = None,
)]
struct Cli {
    /// Log as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the board.
    Show(ShowArgs),

    /// Create a task at the end of a column.
    Add(AddArgs),

    /// Delete a task.
    Delete(DeleteArgs),

    /// Run one drag gesture from `active` to `over`.
    Drag(DragArgs),

    /// Feed a JSON-lines gesture script through the board queue.
    Replay(ReplayArgs),

    /// Replace the board with the starter board.
    Reset(ResetArgs),
}

// ---------------------------------------------------------------------------
// Drag entity argument: `task:<id>` or `column:<id>`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EntityArg(pub DragEntity);

impl FromStr for EntityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| format!("expected 'task:<id>' or 'column:<id>', got '{s}'"))?;
        if id.is_empty() {
            return Err(format!("missing id in '{s}'"));
        }
        match kind.to_ascii_lowercase().as_str() {
            "task" => Ok(Self(DragEntity::task(id))),
            "column" => Ok(Self(DragEntity::column(id))),
            other => Err(format!("unknown entity kind '{other}'; expected: task, column")),
        }
    }
}

impl fmt::Display for EntityArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0.kind {
            EntityKind::Column => "column",
            EntityKind::Task => "task",
            EntityKind::Unknown => "unknown",
        };
        write!(f, "{kind}:{}", self.0.id)
    }
}

impl From<EntityArg> for DragEntity {
    fn from(arg: EntityArg) -> Self {
        arg.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        protask_runtime::init_json_tracing("warn");
    } else {
        protask_runtime::init_tracing("warn");
    }

    match cli.command {
        Commands::Show(args) => args.run(),
        Commands::Add(args) => args.run(),
        Commands::Delete(args) => args.run(),
        Commands::Drag(args) => args.run(),
        Commands::Replay(args) => args.run(),
        Commands::Reset(args) => args.run(),
    }
}
