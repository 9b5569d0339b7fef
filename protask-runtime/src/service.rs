use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use protask_core::{
    Board, BoardError, Change, ColumnId, GestureEvent, GestureStep, Intent, Outcome, Snapshot,
    TaskId,
};
use protask_persist::{Persister, WriteResult};

use crate::error::RuntimeError;

const QUEUE_DEPTH: usize = 64;
const BROADCAST_DEPTH: usize = 256;

type Reply<T> = oneshot::Sender<Result<T, BoardError>>;

enum Request {
    Snapshot {
        respond_to: oneshot::Sender<Arc<Snapshot>>,
    },
    Subscribe {
        respond_to: oneshot::Sender<broadcast::Receiver<Change>>,
    },
    Gesture {
        event: GestureEvent,
        respond_to: Reply<GestureStep>,
    },
    Apply {
        intent: Intent,
        respond_to: Reply<Outcome>,
    },
    AddTask {
        title: String,
        column: ColumnId,
        respond_to: Reply<TaskId>,
    },
    DeleteTask {
        id: TaskId,
        respond_to: Reply<Outcome>,
    },
}

/// Cloneable front door to the board task. Every call is queued and
/// handled one at a time.
#[derive(Debug, Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<Request>,
}

impl BoardHandle {
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, RuntimeError> {
        self.call(|respond_to| Request::Snapshot { respond_to }).await
    }

    /// Changes accepted from now on.
    pub async fn subscribe(&self) -> Result<broadcast::Receiver<Change>, RuntimeError> {
        self.call(|respond_to| Request::Subscribe { respond_to }).await
    }

    pub async fn gesture(&self, event: GestureEvent) -> Result<GestureStep, RuntimeError> {
        Ok(self
            .call(|respond_to| Request::Gesture { event, respond_to })
            .await??)
    }

    pub async fn apply(&self, intent: Intent) -> Result<Outcome, RuntimeError> {
        Ok(self
            .call(|respond_to| Request::Apply { intent, respond_to })
            .await??)
    }

    pub async fn add_task(
        &self,
        title: impl Into<String>,
        column: ColumnId,
    ) -> Result<TaskId, RuntimeError> {
        let title = title.into();
        Ok(self
            .call(|respond_to| Request::AddTask {
                title,
                column,
                respond_to,
            })
            .await??)
    }

    pub async fn delete_task(&self, id: TaskId) -> Result<Outcome, RuntimeError> {
        Ok(self
            .call(|respond_to| Request::DeleteTask { id, respond_to })
            .await??)
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, RuntimeError> {
        let (respond_to, response) = oneshot::channel();
        self.tx
            .send(build(respond_to))
            .await
            .map_err(|_| RuntimeError::ChannelClosed("board queue"))?;
        response
            .await
            .map_err(|_| RuntimeError::ChannelClosed("board reply"))
    }
}

/// Counts from the persistence task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistStats {
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// A running board task plus its optional persistence task.
pub struct Runtime {
    handle: BoardHandle,
    shutdown: broadcast::Sender<()>,
    board_task: JoinHandle<()>,
    persist_task: Option<JoinHandle<PersistStats>>,
}

impl Runtime {
    /// Spawn the board task on the current tokio runtime.
    ///
    /// With a persister, every accepted change is written in order. The
    /// persister subscribes before any request is served, so no change is
    /// missed.
    pub fn start(mut board: Board, persister: Option<Persister>) -> Self {
        let (tx, rx) = mpsc::channel::<Request>(QUEUE_DEPTH);
        let (changes_tx, _) = broadcast::channel::<Change>(BROADCAST_DEPTH);
        let (shutdown, _) = broadcast::channel::<()>(4);

        let persist_task = persister.map(|persister| {
            let changes = changes_tx.subscribe();
            tokio::spawn(persist_task(persister, changes))
        });

        let board_changes = board.subscribe();
        let board_task = {
            let shutdown_rx = shutdown.subscribe();
            tokio::spawn(board_task(board, board_changes, rx, changes_tx, shutdown_rx))
        };

        Self {
            handle: BoardHandle { tx },
            shutdown,
            board_task,
            persist_task,
        }
    }

    pub fn handle(&self) -> BoardHandle {
        self.handle.clone()
    }

    /// Stop the board task, let the persister finish every pending change,
    /// and return its counts.
    pub async fn shutdown(self) -> Result<PersistStats, RuntimeError> {
        let _ = self.shutdown.send(());
        drop(self.handle);
        self.board_task.await?;
        match self.persist_task {
            Some(task) => Ok(task.await?),
            None => Ok(PersistStats::default()),
        }
    }
}

async fn board_task(
    mut board: Board,
    board_changes: std::sync::mpsc::Receiver<Change>,
    mut rx: mpsc::Receiver<Request>,
    changes_tx: broadcast::Sender<Change>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            request = rx.recv() => {
                let Some(request) = request else { break };
                serve(&mut board, request, &changes_tx);
                publish(&board_changes, &changes_tx);
            }
        }
    }

    // Requests queued before shutdown are still answered.
    rx.close();
    let mut drained = 0usize;
    while let Some(request) = rx.recv().await {
        serve(&mut board, request, &changes_tx);
        publish(&board_changes, &changes_tx);
        drained += 1;
    }
    tracing::debug!(drained, "board task stopped");
}

fn publish(
    board_changes: &std::sync::mpsc::Receiver<Change>,
    changes_tx: &broadcast::Sender<Change>,
) {
    for change in board_changes.try_iter() {
        // No receivers is fine; nobody is listening yet.
        let _ = changes_tx.send(change);
    }
}

fn serve(board: &mut Board, request: Request, changes_tx: &broadcast::Sender<Change>) {
    match request {
        Request::Snapshot { respond_to } => {
            let _ = respond_to.send(board.snapshot());
        }
        Request::Subscribe { respond_to } => {
            let _ = respond_to.send(changes_tx.subscribe());
        }
        Request::Gesture { event, respond_to } => {
            let _ = respond_to.send(board.handle(&event));
        }
        Request::Apply { intent, respond_to } => {
            let _ = respond_to.send(board.apply(intent));
        }
        Request::AddTask {
            title,
            column,
            respond_to,
        } => {
            let _ = respond_to.send(board.add_task(title, column));
        }
        Request::DeleteTask { id, respond_to } => {
            let _ = respond_to.send(board.delete_task(id));
        }
    }
}

/// Writes each broadcast change. Ends once the board task is gone and the
/// backlog is drained.
async fn persist_task(
    persister: Persister,
    mut changes: broadcast::Receiver<Change>,
) -> PersistStats {
    let mut stats = PersistStats::default();
    loop {
        let change = match changes.recv().await {
            Ok(change) => change,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Later changes carry the full snapshot.
                tracing::warn!(skipped, "persister lagged behind board changes");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let persister = persister.clone();
        let started = Instant::now();
        let result = tokio::task::spawn_blocking(move || persister.handle(&change)).await;
        match result {
            Ok(Ok(WriteResult::Written { path })) => {
                stats.written += 1;
                tracing::info!(
                    path = %path.display(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "board saved",
                );
            }
            Ok(Ok(WriteResult::Unchanged { .. })) => stats.unchanged += 1,
            Ok(Err(err)) => {
                stats.failed += 1;
                tracing::error!(error = %err, "saving board failed");
            }
            Err(err) => {
                stats.failed += 1;
                tracing::error!(error = %err, "persist task join error");
            }
        }
    }
    stats
}

/// What a replayed gesture script did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub previews: usize,
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub duration_ms: u128,
}

/// Feed gesture events through the queue in order.
///
/// A rejected commit is counted and logged; the replay continues.
pub async fn replay(
    handle: &BoardHandle,
    events: Vec<GestureEvent>,
) -> Result<ReplaySummary, RuntimeError> {
    let started = Instant::now();
    let mut summary = ReplaySummary::default();
    for event in events {
        summary.events += 1;
        match handle.gesture(event).await {
            Ok(GestureStep::Started) => {}
            Ok(GestureStep::Preview(preview)) => {
                if preview.is_some() {
                    summary.previews += 1;
                }
            }
            Ok(GestureStep::Finished(Outcome::Applied(_))) => summary.applied += 1,
            Ok(GestureStep::Finished(Outcome::Ignored(reason))) => {
                summary.ignored += 1;
                tracing::debug!(%reason, "gesture ignored");
            }
            Err(RuntimeError::Board(err)) => {
                summary.rejected += 1;
                tracing::warn!(error = %err, "gesture rejected");
            }
            Err(err) => return Err(err),
        }
    }
    summary.duration_ms = started.elapsed().as_millis();
    Ok(summary)
}
