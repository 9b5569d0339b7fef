//! Board record on disk.
//!
//! # Storage layout
//!
//! ```text
//! ~/.protask/
//!   <storage_key>.json     (record: mode 0600)
//!   <storage_key>.sha256   (digest of the last written state)
//! ```
//!
//! ## `save_at`: hash-gated atomic write
//!
//! 1. Serialize the snapshot (compact JSON) and SHA-256 it, together with
//!    the id watermark when there is one.
//! 2. Compare with the stored digest → skip if identical and the record exists.
//! 3. Write the record envelope to `<path>.tmp`.
//! 4. Rename to the final path (atomic on POSIX).
//! 5. Write the digest the same way.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use protask_core::{config::protask_root, BoardConfig, Column, Snapshot, Task};

use crate::error::{io_err, PersistError};

/// Envelope version written by this crate.
pub const RECORD_VERSION: u32 = 0;

/// On-disk record: the board state plus envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub state: Snapshot,
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    /// Id counter of the board that wrote the record. Sequential ids resume
    /// from it so deleted ids are not issued again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

impl Record {
    fn fresh(state: Snapshot) -> Self {
        Self {
            state,
            version: RECORD_VERSION,
            saved_at: None,
            next_id: None,
        }
    }
}

/// Records written before the envelope existed held the bare snapshot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordCompat {
    Envelope(Record),
    Bare(BareSnapshot),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BareSnapshot {
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

/// Outcome of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Record was written (state changed or no record existed).
    Written { path: PathBuf },
    /// Skipped: the state matches the stored digest.
    Unchanged { path: PathBuf },
}

/// `<home>/.protask/<key>.json`: pure, no I/O.
pub fn record_path_at(home: &Path, key: &str) -> PathBuf {
    protask_root(home).join(format!("{key}.json"))
}

/// `<home>/.protask/<key>.sha256`: pure, no I/O.
pub fn digest_path_at(home: &Path, key: &str) -> PathBuf {
    protask_root(home).join(format!("{key}.sha256"))
}

/// Load the record for `key`. `None` when nothing has been saved yet.
///
/// The loaded state is validated; a record with dangling column references
/// or duplicate ids is rejected with [`PersistError::Invalid`].
pub fn load_at(home: &Path, key: &str) -> Result<Option<Record>, PersistError> {
    let path = record_path_at(home, key);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let record = match serde_json::from_str::<RecordCompat>(&contents) {
        Ok(RecordCompat::Envelope(record)) => record,
        Ok(RecordCompat::Bare(bare)) => Record::fresh(Snapshot::new(bare.columns, bare.tasks)),
        Err(source) => return Err(PersistError::Parse { path, source }),
    };
    if let Err(source) = record.state.validate() {
        return Err(PersistError::Invalid { path, source });
    }
    Ok(Some(record))
}

/// The persisted record, or one holding the starter board on first run.
pub fn load_or_seed_at(home: &Path, config: &BoardConfig) -> Result<Record, PersistError> {
    match load_at(home, &config.storage_key)? {
        Some(record) => Ok(record),
        None => {
            tracing::info!(
                "no board record '{}' yet; starting from the starter board",
                config.storage_key
            );
            Ok(Record::fresh(Snapshot::seeded(config.seed_tasks)))
        }
    }
}

/// Atomically save `snapshot` and its id watermark under `key`, skipping
/// identical content.
pub fn save_at(
    home: &Path,
    key: &str,
    snapshot: &Snapshot,
    next_id: Option<u64>,
) -> Result<WriteResult, PersistError> {
    let path = record_path_at(home, key);
    let digest_path = digest_path_at(home, key);

    let state_json = serde_json::to_string(snapshot)?;
    let digest = {
        let mut h = Sha256::new();
        h.update(state_json.as_bytes());
        if let Some(next) = next_id {
            h.update(format!("\nnextId={next}").as_bytes());
        }
        hex::encode(h.finalize())
    };

    if path.exists() {
        if let Ok(stored) = std::fs::read_to_string(&digest_path) {
            if stored.trim() == digest {
                tracing::debug!("unchanged: {}", path.display());
                return Ok(WriteResult::Unchanged { path });
            }
        }
    }

    let record = Record {
        state: snapshot.clone(),
        version: RECORD_VERSION,
        saved_at: Some(Utc::now()),
        next_id,
    };
    let body = serde_json::to_string_pretty(&record)?;

    let root = protask_root(home);
    std::fs::create_dir_all(&root).map_err(|e| io_err(&root, e))?;
    write_atomic(&path, &body)?;
    set_file_permissions(&path)?;
    write_atomic(&digest_path, &digest)?;

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written { path })
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PersistError> {
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), PersistError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), PersistError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "protask-storage";

    #[test]
    fn record_path_is_correct() {
        let home = TempDir::new().unwrap();
        let path = record_path_at(home.path(), KEY);
        assert!(path.ends_with(".protask/protask-storage.json"));
    }

    #[test]
    fn missing_record_loads_as_none() {
        let home = TempDir::new().unwrap();
        assert!(load_at(home.path(), KEY).unwrap().is_none());
    }

    #[test]
    fn missing_record_seeds_per_config() {
        let home = TempDir::new().unwrap();
        let config = BoardConfig {
            seed_tasks: false,
            ..BoardConfig::default()
        };
        let record = load_or_seed_at(home.path(), &config).unwrap();
        assert_eq!(record.state, Snapshot::seeded(false));
        assert_eq!(record.next_id, None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().unwrap();
        let snapshot = Snapshot::seeded(true);
        let result = save_at(home.path(), KEY, &snapshot, None).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));

        let record = load_at(home.path(), KEY).unwrap().expect("record");
        assert_eq!(record.state, snapshot);
        assert_eq!(record.version, RECORD_VERSION);
        assert!(record.saved_at.is_some());
    }

    #[test]
    fn second_save_same_state_is_unchanged() {
        let home = TempDir::new().unwrap();
        let snapshot = Snapshot::seeded(true);
        save_at(home.path(), KEY, &snapshot, None).unwrap();
        let result = save_at(home.path(), KEY, &snapshot, None).unwrap();
        assert!(matches!(result, WriteResult::Unchanged { .. }));
    }

    #[test]
    fn changed_state_is_written() {
        let home = TempDir::new().unwrap();
        save_at(home.path(), KEY, &Snapshot::seeded(true), None).unwrap();
        let result = save_at(home.path(), KEY, &Snapshot::seeded(false), None).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        let record = load_at(home.path(), KEY).unwrap().expect("record");
        assert!(record.state.tasks.is_empty());
    }

    #[test]
    fn deleted_record_is_rewritten_even_with_matching_digest() {
        let home = TempDir::new().unwrap();
        let snapshot = Snapshot::seeded(true);
        save_at(home.path(), KEY, &snapshot, None).unwrap();
        std::fs::remove_file(record_path_at(home.path(), KEY)).unwrap();
        let result = save_at(home.path(), KEY, &snapshot, None).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
    }

    #[test]
    fn tmp_files_cleaned_up_after_save() {
        let home = TempDir::new().unwrap();
        save_at(home.path(), KEY, &Snapshot::seeded(true), None).unwrap();
        let tmp = PathBuf::from(format!("{}.tmp", record_path_at(home.path(), KEY).display()));
        assert!(!tmp.exists(), "tmp file should be removed after atomic rename");
    }

    #[test]
    fn keys_are_separate_namespaces() {
        let home = TempDir::new().unwrap();
        save_at(home.path(), "work", &Snapshot::seeded(true), None).unwrap();
        save_at(home.path(), "home", &Snapshot::seeded(false), None).unwrap();
        assert_eq!(load_at(home.path(), "work").unwrap().unwrap().state.tasks.len(), 5);
        assert!(load_at(home.path(), "home").unwrap().unwrap().state.tasks.is_empty());
    }

    #[test]
    fn bare_snapshot_record_is_accepted() {
        let home = TempDir::new().unwrap();
        let path = record_path_at(home.path(), KEY);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"columns":[{"id":"todo","title":"To Do"}],"tasks":[{"id":"t1","title":"x","columnId":"todo"}]}"#,
        )
        .unwrap();

        let record = load_at(home.path(), KEY).unwrap().expect("record");
        assert_eq!(
            record.state,
            Snapshot::new(vec![Column::new("todo", "To Do")], vec![Task::new("t1", "x", "todo")])
        );
        assert!(record.saved_at.is_none());
    }

    #[test]
    fn dangling_reference_on_disk_is_rejected() {
        let home = TempDir::new().unwrap();
        let path = record_path_at(home.path(), KEY);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"{"state":{"columns":[],"tasks":[{"id":"t1","title":"x","columnId":"gone"}]},"version":0}"#,
        )
        .unwrap();

        let err = load_at(home.path(), KEY).unwrap_err();
        assert!(matches!(err, PersistError::Invalid { .. }), "got: {err}");
        assert!(err.to_string().contains("protask-storage.json"));
    }

    #[test]
    fn corrupt_record_reports_path() {
        let home = TempDir::new().unwrap();
        let path = record_path_at(home.path(), KEY);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{ not json").unwrap();

        let err = load_at(home.path(), KEY).unwrap_err();
        assert!(matches!(err, PersistError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn broken_envelope_is_not_mistaken_for_bare_snapshot() {
        let home = TempDir::new().unwrap();
        let path = record_path_at(home.path(), KEY);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"state":{"columns":[],"tasks":[]},"version":"zero"}"#).unwrap();

        let err = load_at(home.path(), KEY).unwrap_err();
        assert!(matches!(err, PersistError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn id_watermark_roundtrips_and_counts_as_a_change() {
        let home = TempDir::new().unwrap();
        let snapshot = Snapshot::seeded(true);
        save_at(home.path(), KEY, &snapshot, Some(7)).unwrap();
        assert_eq!(load_at(home.path(), KEY).unwrap().unwrap().next_id, Some(7));

        let result = save_at(home.path(), KEY, &snapshot, Some(8)).unwrap();
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(load_at(home.path(), KEY).unwrap().unwrap().next_id, Some(8));

        let raw = std::fs::read_to_string(record_path_at(home.path(), KEY)).unwrap();
        assert!(raw.contains(r#""nextId": 8"#));
    }

    #[test]
    #[cfg(unix)]
    fn record_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let home = TempDir::new().unwrap();
        save_at(home.path(), KEY, &Snapshot::seeded(true), None).unwrap();
        let mode = std::fs::metadata(record_path_at(home.path(), KEY))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "expected 0600, got {mode:o}");
    }
}
