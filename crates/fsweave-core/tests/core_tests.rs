use fsweave_core::{
    ConfigError, DetectorConfig, EventKind, EventLogError, FileEvent, OperationType, load_events,
};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tempfile::TempDir;

#[test]
fn test_event_constructors() {
    let now = chrono::Utc::now();

    let created = FileEvent::created("/src/a.rs", now);
    assert_eq!(created.event_type, EventKind::Created);
    assert!(created.dest_path.is_none());
    assert!(created.is_content_change());
    assert!(!created.is_move());

    let moved = FileEvent::moved("/src/a.rs", "/src/b.rs", now);
    assert!(moved.is_move());
    assert!(!moved.is_content_change());
    assert_eq!(moved.dest_path.as_deref(), Some(Path::new("/src/b.rs")));
}

#[test]
fn test_every_label_parses_back() {
    for kind in EventKind::iter() {
        assert_eq!(EventKind::from_str(&kind.to_string()).unwrap(), kind);
    }
    for op in OperationType::iter() {
        assert_eq!(OperationType::from_str(&op.to_string()).unwrap(), op);
    }
}

#[test]
fn test_load_events_from_file() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("events.jsonl");
    fs::write(
        &log,
        concat!(
            r#"{"path": "notes.txt", "dest_path": "notes.txt.bak", "event_type": "moved", "timestamp": "2024-05-01T10:00:00Z"}"#,
            "\n",
            r#"{"path": "notes.txt", "event_type": "created", "timestamp": "2024-05-01T10:00:01Z"}"#,
            "\n",
        ),
    )
    .unwrap();

    let events = load_events(&log).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].target(), Path::new("notes.txt.bak"));
    assert!(events[0].timestamp < events[1].timestamp);
}

#[test]
fn test_load_events_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = load_events(temp.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, EventLogError::Io { .. }));
}

#[test]
fn test_load_config_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fsweave.toml");
    fs::write(
        &path,
        "backup_window_secs = 0.5\nbackup_patterns = [\"*.sav\"]\n",
    )
    .unwrap();

    let config = DetectorConfig::load(&path).unwrap();
    assert_eq!(config.backup_window_secs, 0.5);
    assert_eq!(config.backup_patterns, vec!["*.sav".to_string()]);
    // Untouched keys keep their defaults
    assert_eq!(config.batch_window_secs, 5.0);
    assert!(!config.temp_patterns.is_empty());
}

#[test]
fn test_load_config_missing_file() {
    let err = DetectorConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
