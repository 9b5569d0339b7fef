//! `protask replay <script.jsonl>`
//!
//! Runs a gesture script through the runtime queue, persisting as it goes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use protask_core::gesture::parse_script;
use protask_runtime::{replay, PersistStats, ReplaySummary, Runtime};

use super::Session;

/// Arguments for `protask replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines file, one gesture event per line.
    pub script: PathBuf,

    /// Emit the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ReplayReport {
    summary: ReplaySummary,
    persisted: PersistStats,
    skipped_lines: Vec<usize>,
}

impl ReplayArgs {
    pub fn run(self) -> Result<()> {
        let text = fs::read_to_string(&self.script)
            .with_context(|| format!("cannot read script '{}'", self.script.display()))?;
        let script = parse_script(&text);
        let (events, skipped_lines) = (script.events, script.skipped);

        // The runtime owns the board from here on; changes reach disk
        // through its persistence task.
        let Session {
            board, persister, ..
        } = Session::open()?;

        let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
        let (summary, persisted) = rt.block_on(async move {
            let runtime = Runtime::start(board, Some(persister));
            let summary = replay(&runtime.handle(), events).await;
            let persisted = runtime.shutdown().await;
            Ok::<_, anyhow::Error>((summary?, persisted?))
        })?;

        let report = ReplayReport {
            summary,
            persisted,
            skipped_lines,
        };
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize replay JSON")?
            );
            return Ok(());
        }
        print_report(&self.script, &report);
        Ok(())
    }
}

fn print_report(script: &Path, report: &ReplayReport) {
    let s = &report.summary;
    println!(
        "✓ Replayed '{}' ({} events: {} applied, {} ignored, {} rejected, {} previews)",
        script.display(),
        s.events,
        s.applied,
        s.ignored,
        s.rejected,
        s.previews,
    );
    println!(
        "  Saved {} times ({} unchanged, {} failed)",
        report.persisted.written, report.persisted.unchanged, report.persisted.failed
    );
    if !report.skipped_lines.is_empty() {
        let lines: Vec<String> = report.skipped_lines.iter().map(|n| n.to_string()).collect();
        println!("  Skipped malformed lines: {}", lines.join(", "));
    }
}
