//! MarkConfig loading from TOML files.

use std::path::PathBuf;

use codemark_core::config::SelectionOrderKind;
use codemark_core::errors::ConfigError;
use codemark_core::{CodemarkErrorCode, MarkConfig};

#[test]
fn full_config_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("codemark.toml");
    std::fs::write(
        &path,
        r#"
language = "java"
dataset_name = "csn"
data_path = "data/java.jsonl"
output_dir = "out"
backdoors = [["unequal_null", "is_empty:compare_true"], ["init_string"]]
mark_rates = [0.1, 1.0]
threads = 4

[parse]
max_depth = 200
reject_error_trees = false

[rewrite]
verify = false
search_budget = 64

[selection]
order = "hashed"
seed = 9
"#,
    )
    .unwrap();

    let config = MarkConfig::from_file(&path).unwrap();
    assert_eq!(config.effective_language().unwrap(), "java");
    assert_eq!(config.effective_data_path().unwrap(), PathBuf::from("data/java.jsonl"));
    assert_eq!(config.effective_output_dir(), PathBuf::from("out"));
    assert_eq!(config.backdoors.as_ref().unwrap()[0][1], "is_empty:compare_true");
    assert_eq!(config.effective_mark_rates(), vec![0.1, 1.0]);
    assert_eq!(config.effective_threads(), 4);
    assert_eq!(config.parse.effective_max_depth(), 200);
    assert!(!config.parse.effective_reject_error_trees());
    assert!(!config.rewrite.effective_verify());
    assert_eq!(config.rewrite.effective_search_budget(), 64);
    assert_eq!(config.selection.effective_order(), SelectionOrderKind::Hashed);
    assert_eq!(config.selection.effective_seed(), 9);
}

#[test]
fn unreadable_and_malformed_files_are_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = MarkConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Read { .. }));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "mark_rates = \"all\"").unwrap();
    let err = MarkConfig::from_file(&bad).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}
