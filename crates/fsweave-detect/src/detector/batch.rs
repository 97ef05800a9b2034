//! Batch updates: several related files in one directory changing within a few seconds.

use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;

use fsweave_core::{FileEvent, FileOperation, OperationType};

use super::{BATCH_UPDATE_CONFIDENCE, OperationDraft, PatternDetector};
use crate::classify::NameClassifier;
use crate::heuristics::files_are_related;

impl<C: NameClassifier> PatternDetector<C> {
    /// Find the first directory whose create/modify/delete events form a batch.
    ///
    /// Directories are tried in the order they first appear in `events`.
    pub fn detect_batch_update(&self, events: &[FileEvent]) -> Option<FileOperation> {
        self.batch_updates(events).next()
    }

    /// Find every directory whose create/modify/delete events form a batch.
    pub fn detect_batch_updates(&self, events: &[FileEvent]) -> Vec<FileOperation> {
        self.batch_updates(events).collect()
    }

    fn batch_updates<'a>(
        &'a self,
        events: &'a [FileEvent],
    ) -> impl Iterator<Item = FileOperation> + 'a {
        let min_size = self.config.min_batch_size;
        let groups = if events.len() < min_size {
            IndexMap::new()
        } else {
            group_by_dir(events)
        };

        groups
            .into_iter()
            .filter(move |(_, group)| group.len() >= min_size)
            .filter_map(move |(dir, group)| self.batch_in_dir(dir, group))
    }

    fn batch_in_dir(&self, dir: &Path, group: Vec<&FileEvent>) -> Option<FileOperation> {
        let group: Vec<FileEvent> = group
            .into_iter()
            .cloned()
            .sorted_by_key(|e| e.timestamp)
            .collect();

        let span = group.last()?.timestamp - group.first()?.timestamp;
        if span > self.config.batch_window() {
            tracing::trace!(dir = %dir.display(), span_ms = span.num_milliseconds(), "batch span too wide");
            return None;
        }
        if !files_are_related(&group, self.config.min_prefix_len) {
            tracing::trace!(dir = %dir.display(), "batch files look unrelated");
            return None;
        }

        let file_count = group.len();
        tracing::debug!(dir = %dir.display(), file_count, "detected batch update");

        OperationDraft {
            operation_type: OperationType::BatchUpdate,
            primary_path: dir.to_path_buf(),
            files_affected: group.iter().map(|e| e.path.clone()).collect(),
            description: format!("Updated {} related files in {}", file_count, dir.display()),
            events: group,
            confidence: BATCH_UPDATE_CONFIDENCE,
            is_atomic: false,
            pattern: "batch_update",
        }
        .finish([("file_count", Value::from(file_count))])
    }
}

/// Content changes grouped by parent directory, directories in first-seen order.
fn group_by_dir(events: &[FileEvent]) -> IndexMap<&Path, Vec<&FileEvent>> {
    let mut groups: IndexMap<&Path, Vec<&FileEvent>> = IndexMap::new();
    for event in events.iter().filter(|e| e.is_content_change()) {
        groups.entry(event.parent_dir()).or_default().push(event);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, Utc};
    use std::path::PathBuf;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_group_by_dir_keeps_first_seen_order() {
        let events = vec![
            FileEvent::created("/b/1.txt", at(0)),
            FileEvent::moved("/c/x", "/c/y", at(0)),
            FileEvent::created("/a/1.txt", at(1)),
            FileEvent::deleted("/b/2.txt", at(2)),
        ];
        let groups = group_by_dir(&events);
        let dirs: Vec<_> = groups.keys().copied().collect();
        assert_eq!(dirs, vec![Path::new("/b"), Path::new("/a")]);
        assert_eq!(groups[Path::new("/b")].len(), 2);
    }

    #[test]
    fn test_batch_ignores_moves() {
        let events = vec![
            FileEvent::moved("/gen/a.o", "/gen/a2.o", at(0)),
            FileEvent::moved("/gen/b.o", "/gen/b2.o", at(1)),
            FileEvent::created("/gen/c.o", at(1)),
            FileEvent::created("/gen/d.o", at(2)),
        ];
        assert!(PatternDetector::new().detect_batch_update(&events).is_none());
    }

    #[test]
    fn test_batch_fields() {
        let base = at(0);
        let events = vec![
            FileEvent::modified("/gen/b.rs", base + TimeDelta::milliseconds(400)),
            FileEvent::created("/gen/a.rs", base),
            FileEvent::deleted("/gen/c.rs", base + TimeDelta::milliseconds(900)),
        ];
        let op = PatternDetector::new().detect_batch_update(&events).unwrap();

        assert_eq!(op.operation_type, OperationType::BatchUpdate);
        assert_eq!(op.primary_path, PathBuf::from("/gen"));
        assert_eq!(op.confidence, BATCH_UPDATE_CONFIDENCE);
        assert!(!op.is_atomic);
        assert!(op.is_safe);
        assert_eq!(op.metadata_u64("file_count"), Some(3));
        assert_eq!(op.pattern(), Some("batch_update"));
        // Sorted chronologically
        assert_eq!(
            op.files_affected,
            vec![
                PathBuf::from("/gen/a.rs"),
                PathBuf::from("/gen/b.rs"),
                PathBuf::from("/gen/c.rs"),
            ]
        );
        assert_eq!(op.duration(), TimeDelta::milliseconds(900));
    }

    #[test]
    fn test_batch_keeps_duplicate_paths() {
        let events = vec![
            FileEvent::created("/out/x.json", at(0)),
            FileEvent::modified("/out/x.json", at(1)),
            FileEvent::deleted("/out/x.json", at(2)),
        ];
        let op = PatternDetector::new().detect_batch_update(&events).unwrap();
        assert_eq!(op.files_affected.len(), 3);
    }
}
