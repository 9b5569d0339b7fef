//! Gesture events and gesture scripts.
//!
//! A gesture is `start -> [over]* -> end`, or `start -> cancel` when the
//! pointer is lost. Events arrive from the gesture layer as JSON; a
//! *gesture script* is a JSON-lines file of them, one event per line.
//!
//! ```text
//! {"event":"start","active":{"id":"task-1","type":"Task"}}
//! {"event":"over","active":{"id":"task-1","type":"Task"},"over":{"id":"done","type":"Column"}}
//! {"event":"end","active":{"id":"task-1","type":"Task"},"over":{"id":"done","type":"Column"}}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Outcome};
use crate::error::BoardError;
use crate::types::{DragEntity, Snapshot};

/// One event from the gesture layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    Start {
        active: DragEntity,
    },
    Over {
        active: DragEntity,
        #[serde(default)]
        over: Option<DragEntity>,
    },
    End {
        active: DragEntity,
        #[serde(default)]
        over: Option<DragEntity>,
    },
    Cancel,
}

/// What handling one event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureStep {
    Started,
    /// Preview for a drag-over; `None` when no gesture was in progress.
    Preview(Option<Arc<Snapshot>>),
    Finished(Outcome),
}

impl Board {
    /// Feed one gesture event into the board.
    pub fn handle(&mut self, event: &GestureEvent) -> Result<GestureStep, BoardError> {
        match event {
            GestureEvent::Start { active } => {
                self.drag_start(active.clone());
                Ok(GestureStep::Started)
            }
            GestureEvent::Over { active, over } => {
                Ok(GestureStep::Preview(self.drag_over(active, over.as_ref())))
            }
            GestureEvent::End { active, over } => {
                self.drag_end(active, over.as_ref()).map(GestureStep::Finished)
            }
            GestureEvent::Cancel => Ok(GestureStep::Finished(self.drag_cancel())),
        }
    }
}

/// Parsed gesture script.
#[derive(Debug, Default)]
pub struct Script {
    pub events: Vec<GestureEvent>,
    /// 1-based line numbers that were not valid events.
    pub skipped: Vec<usize>,
}

/// Parse a JSON-lines gesture script.
///
/// Blank lines and `#` comments are allowed. Malformed lines are skipped
/// and reported, never fatal.
pub fn parse_script(text: &str) -> Script {
    let mut script = Script::default();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<GestureEvent>(line) {
            Ok(event) => script.events.push(event),
            Err(err) => {
                tracing::warn!("skipping gesture script line {}: {err}", index + 1);
                script.skipped.push(index + 1);
            }
        }
    }
    script
}
