use protask_core::{
    Board, BoardConfig, ColumnId, DragEntity, GestureEvent, IdScheme, TaskId,
};
use protask_persist::{load_or_seed_at, Persister};
use protask_runtime::{replay, Runtime};
use tempfile::TempDir;

fn config() -> BoardConfig {
    BoardConfig {
        id_scheme: IdScheme::Sequential,
        ..BoardConfig::default()
    }
}

async fn open(home: &TempDir) -> Runtime {
    let config = config();
    let record = load_or_seed_at(home.path(), &config).expect("load");
    let ids = config.id_scheme.resume(record.next_id, &record.state.tasks);
    let board = Board::with_ids(record.state, ids).expect("board");
    Runtime::start(board, Some(Persister::from_config(home.path(), &config)))
}

#[tokio::test]
async fn second_session_resumes_from_saved_board() {
    let home = TempDir::new().expect("home");

    let first = open(&home).await;
    let handle = first.handle();
    let added = handle
        .add_task("Ship it", ColumnId::from("inprogress"))
        .await
        .expect("add");
    assert_eq!(added, TaskId::from("task-6"));
    let summary = replay(
        &handle,
        vec![GestureEvent::End {
            active: DragEntity::task("task-6"),
            over: Some(DragEntity::task("task-1")),
        }],
    )
    .await
    .expect("replay");
    assert_eq!(summary.applied, 1);
    let saved = handle.snapshot().await.expect("snapshot");
    let stats = first.shutdown().await.expect("shutdown");
    assert_eq!(stats.written, 2);

    let second = open(&home).await;
    let resumed = second.handle().snapshot().await.expect("snapshot");
    assert_eq!(*resumed, *saved);
    assert_eq!(resumed.tasks[0].id, TaskId::from("task-6"));
    assert_eq!(resumed.tasks[0].column_id, ColumnId::from("todo"));

    let next = second
        .handle()
        .add_task("Follow up", ColumnId::from("todo"))
        .await
        .expect("add");
    assert_eq!(next, TaskId::from("task-7"));
    second.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn deleted_id_stays_retired_after_restart() {
    let home = TempDir::new().expect("home");

    let first = open(&home).await;
    let handle = first.handle();
    let added = handle
        .add_task("Gone soon", ColumnId::from("todo"))
        .await
        .expect("add");
    handle.delete_task(added.clone()).await.expect("delete");
    first.shutdown().await.expect("shutdown");

    let second = open(&home).await;
    let next = second
        .handle()
        .add_task("Replacement", ColumnId::from("todo"))
        .await
        .expect("add");
    assert_ne!(next, added);
    second.shutdown().await.expect("shutdown");
}
