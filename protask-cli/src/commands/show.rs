//! `protask show`: print the board.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use protask_core::Snapshot;

use super::Session;

/// Arguments for `protask show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit the snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let session = Session::open()?;
        let snapshot = session.board.snapshot();
        if self.json {
            print_json(&snapshot)?;
            return Ok(());
        }
        print_board(&snapshot);
        Ok(())
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "title")]
    title: String,
}

pub fn print_json(snapshot: &Snapshot) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(snapshot).context("failed to serialize board JSON")?
    );
    Ok(())
}

pub fn print_board(snapshot: &Snapshot) {
    println!(
        "ProTask v{} | {} columns | {} tasks",
        env!("CARGO_PKG_VERSION"),
        snapshot.columns.len(),
        snapshot.tasks.len(),
    );

    let separator = "■".repeat(48).bright_black().to_string();
    println!("{separator}");
    for column in &snapshot.columns {
        let rows: Vec<TaskRow> = snapshot
            .tasks_in(&column.id)
            .enumerate()
            .map(|(index, task)| TaskRow {
                position: index + 1,
                id: task.id.to_string(),
                title: task.title.clone(),
            })
            .collect();
        println!(
            "{} {}",
            column.title.to_uppercase().bold(),
            format!("({}, {})", column.id, rows.len()).bright_black()
        );
        if rows.is_empty() {
            println!("  (empty)");
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        println!("{separator}");
    }
}
