//! Config loading against a scratch home directory.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use protask_core::{config, BoardConfig, ConfigError, IdScheme};

#[test]
fn defaults_without_touching_disk() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let loaded = BoardConfig::load_at(home.path()).expect("load");
    assert_eq!(loaded, BoardConfig::default());
    home.child(".protask").assert(predicate::path::missing());
}

#[test]
fn reads_yaml_overrides() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".protask/config.yaml")
        .write_str("storage_key: team-board\nid_scheme: sequential\n")
        .expect("write");

    let loaded = BoardConfig::load_at(home.path()).expect("load");
    assert_eq!(loaded.storage_key, "team-board");
    assert_eq!(loaded.id_scheme, IdScheme::Sequential);
    assert!(loaded.seed_tasks);
}

#[test]
fn empty_file_is_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".protask/config.yaml").write_str("\n").expect("write");
    assert_eq!(
        BoardConfig::load_at(home.path()).expect("load"),
        BoardConfig::default()
    );
}

#[test]
fn wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".protask/config.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = BoardConfig::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    let path = config::config_path_at(home.path());
    assert!(err.to_string().contains(&path.display().to_string()));
}
