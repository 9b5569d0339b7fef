//! Task id generation.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{Task, TaskId};

/// Produces fresh task ids.
pub trait IdGenerator: Send {
    /// Return an id not present in `existing` and never returned before by
    /// this generator.
    fn next_task_id(&mut self, existing: &[Task]) -> TaskId;

    /// Counter state that must outlive the process for ids to stay unique
    /// across sessions. `None` for generators that need nothing stored.
    fn watermark(&self) -> Option<u64> {
        None
    }
}

/// `task-<unix millis>` ids, strictly increasing within the process.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: i64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_task_id(&mut self, existing: &[Task]) -> TaskId {
        let mut stamp = Utc::now().timestamp_millis().max(self.last + 1);
        loop {
            let id = TaskId::from(format!("task-{stamp}"));
            if !existing.iter().any(|t| t.id == id) {
                self.last = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}

/// `task-<n>` ids from a counter. Deterministic; used by tests and scripts.
#[derive(Debug)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Continue a counter saved by an earlier session.
    ///
    /// Starts past both the saved watermark and every `task-<n>` already on
    /// the board, so ids of deleted tasks are not handed out again.
    pub fn resume(watermark: Option<u64>, existing: &[Task]) -> Self {
        let past_existing = existing
            .iter()
            .filter_map(|t| t.id.0.strip_prefix("task-")?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n.saturating_add(1));
        Self::starting_at(watermark.unwrap_or(1).max(past_existing))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_task_id(&mut self, existing: &[Task]) -> TaskId {
        loop {
            let id = TaskId::from(format!("task-{}", self.next));
            self.next += 1;
            if !existing.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }

    fn watermark(&self) -> Option<u64> {
        Some(self.next)
    }
}

/// Which [`IdGenerator`] a board is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Timestamp,
    Sequential,
}

impl IdScheme {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdScheme::Timestamp => Box::new(TimestampIds::new()),
            IdScheme::Sequential => Box::new(SequentialIds::default()),
        }
    }

    /// Generator for a board loaded from storage, given the watermark saved
    /// with it.
    pub fn resume(self, watermark: Option<u64>, existing: &[Task]) -> Box<dyn IdGenerator> {
        match self {
            IdScheme::Timestamp => Box::new(TimestampIds::new()),
            IdScheme::Sequential => Box::new(SequentialIds::resume(watermark, existing)),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::Timestamp => write!(f, "timestamp"),
            IdScheme::Sequential => write!(f, "sequential"),
        }
    }
}

impl FromStr for IdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "timestamp" => Ok(IdScheme::Timestamp),
            "sequential" => Ok(IdScheme::Sequential),
            other => Err(format!(
                "unknown id scheme '{other}'; expected: timestamp, sequential"
            )),
        }
    }
}
