//! Backup saves: `report.txt -> report.txt.bak`, then `report.txt` created again.

use fsweave_core::{EventKind, FileEvent, FileOperation, OperationType};

use super::{BACKUP_CREATE_CONFIDENCE, OperationDraft, PatternDetector, path_value};
use crate::classify::NameClassifier;

impl<C: NameClassifier> PatternDetector<C> {
    /// Find the first move-to-backup immediately followed by a re-create at the original path.
    ///
    /// Pairs are taken by position in `events`, not by timestamp, so the
    /// caller's ordering decides which pairs are considered at all.
    pub fn detect_backup_create(&self, events: &[FileEvent]) -> Option<FileOperation> {
        events
            .windows(2)
            .find_map(|pair| self.backup_pair(&pair[0], &pair[1]))
    }

    /// Find every backup save. A matched pair is consumed and the scan resumes after it.
    pub fn detect_backup_creates(&self, events: &[FileEvent]) -> Vec<FileOperation> {
        let mut found = Vec::new();
        let mut idx = 0;
        while idx + 1 < events.len() {
            match self.backup_pair(&events[idx], &events[idx + 1]) {
                Some(op) => {
                    found.push(op);
                    idx += 2;
                }
                None => idx += 1,
            }
        }
        found
    }

    fn backup_pair(&self, moved: &FileEvent, created: &FileEvent) -> Option<FileOperation> {
        if moved.event_type != EventKind::Moved || created.event_type != EventKind::Created {
            return None;
        }
        if moved.path != created.path {
            return None;
        }

        let backup = moved.target();
        if !self.classifier.is_backup_file(backup) {
            return None;
        }
        if self.classifier.is_temp_file(&created.path) {
            tracing::trace!(path = %created.path.display(), "re-created file is a temp file");
            return None;
        }

        let gap = created.timestamp - moved.timestamp;
        if gap > self.config.backup_window() {
            tracing::trace!(
                path = %created.path.display(),
                gap_ms = gap.num_milliseconds(),
                "backup re-create too late"
            );
            return None;
        }

        let primary_path = created.path.clone();
        tracing::debug!(
            path = %primary_path.display(),
            backup = %backup.display(),
            "detected backup create"
        );

        let mut op = OperationDraft {
            operation_type: OperationType::BackupCreate,
            description: format!(
                "Saved {} after backing it up to {}",
                primary_path.display(),
                backup.display()
            ),
            files_affected: vec![primary_path.clone()],
            primary_path,
            events: vec![moved.clone(), created.clone()],
            confidence: BACKUP_CREATE_CONFIDENCE,
            is_atomic: true,
            pattern: "backup_create",
        }
        .finish([("backup_file", path_value(backup))])?;
        op.has_backup = true;
        Some(op)
    }
}
