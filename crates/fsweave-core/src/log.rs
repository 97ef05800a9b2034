//! Reading recorded event logs.
//!
//! Two layouts are accepted:
//! - a single JSON array of events
//! - JSON lines, one event per line (blank lines are skipped)

use std::path::Path;

use crate::{EventLogError, FileEvent};

/// Parse events from a JSON array or JSON lines document.
pub fn parse_events(source: &str) -> Result<Vec<FileEvent>, EventLogError> {
    if source.trim_start().starts_with('[') {
        return serde_json::from_str(source).map_err(|source| EventLogError::Parse {
            line: source.line(),
            source,
        });
    }

    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| EventLogError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Load events from a file on disk.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<FileEvent>, EventLogError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| EventLogError::io(path, e))?;
    parse_events(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;

    #[test]
    fn test_parse_array() {
        let events = parse_events(
            r#"[
                {"path": "/a/x.txt", "event_type": "created", "timestamp": "2024-05-01T10:00:00Z"},
                {"path": "/a/x.txt", "dest_path": "/a/y.txt", "event_type": "moved", "timestamp": "2024-05-01T10:00:01Z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, EventKind::Moved);
        assert_eq!(events[1].target(), Path::new("/a/y.txt"));
    }

    #[test]
    fn test_parse_json_lines() {
        let source = concat!(
            r#"{"path": "/a/1.log", "event_type": "modified", "timestamp": "2024-05-01T10:00:00Z"}"#,
            "\n\n",
            r#"{"path": "/a/2.log", "event_type": "deleted", "timestamp": "2024-05-01T10:00:02Z"}"#,
            "\n",
        );
        let events = parse_events(source).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, EventKind::Deleted);
    }

    #[test]
    fn test_parse_reports_line() {
        let source = concat!(
            r#"{"path": "/a/1.log", "event_type": "modified", "timestamp": "2024-05-01T10:00:00Z"}"#,
            "\n",
            r#"{"path": "/a/2.log", "event_type": "renamed", "timestamp": "2024-05-01T10:00:02Z"}"#,
        );
        let err = parse_events(source).unwrap_err();
        assert!(matches!(err, EventLogError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_events("").unwrap().is_empty());
        assert!(parse_events("[]").unwrap().is_empty());
    }
}
