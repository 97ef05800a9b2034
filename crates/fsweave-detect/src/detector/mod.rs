//! The pattern detector.
//!
//! Each heuristic lives in its own submodule as an `impl` block on
//! [`PatternDetector`]. All of them are pure functions of the input slice:
//! nothing is cached between calls and the caller's events are never reordered.

mod backup;
mod batch;
mod rename;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use fsweave_core::{DetectorConfig, FileEvent, FileOperation, OperationMetadata, OperationType};

use crate::classify::{ClassifierError, ConventionClassifier, GlobClassifier, NameClassifier};

/// Confidence assigned to rename sequences.
pub const RENAME_SEQUENCE_CONFIDENCE: f64 = 0.90;
/// Confidence assigned to batch updates.
pub const BATCH_UPDATE_CONFIDENCE: f64 = 0.85;
/// Confidence assigned to backup-then-create sequences.
pub const BACKUP_CREATE_CONFIDENCE: f64 = 0.90;

/// Reconstructs composite operations from raw file events.
#[derive(Debug, Clone)]
pub struct PatternDetector<C = ConventionClassifier> {
    config: DetectorConfig,
    classifier: C,
}

impl PatternDetector<ConventionClassifier> {
    /// Create a detector with default thresholds and built-in naming conventions.
    pub fn new() -> Self {
        Self::with_classifier(DetectorConfig::default(), ConventionClassifier)
    }
}

impl Default for PatternDetector<ConventionClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternDetector<GlobClassifier> {
    /// Create a detector whose classifier is compiled from the config's patterns.
    pub fn from_config(config: DetectorConfig) -> Result<Self, ClassifierError> {
        let classifier = GlobClassifier::new(&config.backup_patterns, &config.temp_patterns)?;
        Ok(Self::with_classifier(config, classifier))
    }
}

impl<C: NameClassifier> PatternDetector<C> {
    /// Create a detector with a custom classifier.
    pub fn with_classifier(config: DetectorConfig, classifier: C) -> Self {
        Self { config, classifier }
    }

    /// The active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// The active name classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Run every heuristic and collect all matches, ordered by start time.
    pub fn detect_all(&self, events: &[FileEvent]) -> Vec<FileOperation> {
        let mut operations: Vec<FileOperation> = self
            .detect_rename_sequence(events)
            .into_iter()
            .chain(self.detect_batch_updates(events))
            .chain(self.detect_backup_creates(events))
            .collect();

        operations.sort_by_key(|op| op.start_time);
        tracing::debug!(
            events = events.len(),
            operations = operations.len(),
            "pattern detection finished"
        );
        operations
    }
}

/// Fields every detector fills in. The rest start from their defaults.
struct OperationDraft {
    operation_type: OperationType,
    primary_path: PathBuf,
    events: Vec<FileEvent>,
    confidence: f64,
    description: String,
    is_atomic: bool,
    files_affected: Vec<PathBuf>,
    pattern: &'static str,
}

impl OperationDraft {
    /// Finish the operation. `events` must be non-empty and chronological.
    fn finish(self, extra: impl IntoIterator<Item = (&'static str, Value)>) -> Option<FileOperation> {
        let (start_time, end_time) = time_bounds(&self.events)?;

        let mut metadata = OperationMetadata::new();
        metadata.extend(extra.into_iter().map(|(k, v)| (k.to_string(), v)));
        metadata.insert("pattern".to_string(), Value::from(self.pattern));

        Some(FileOperation {
            operation_type: self.operation_type,
            primary_path: self.primary_path,
            events: self.events,
            confidence: self.confidence,
            description: self.description,
            start_time,
            end_time,
            is_atomic: self.is_atomic,
            is_safe: true,
            has_backup: false,
            files_affected: self.files_affected,
            metadata,
        })
    }
}

fn time_bounds(events: &[FileEvent]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    Some((events.first()?.timestamp, events.last()?.timestamp))
}

fn path_value(path: &Path) -> Value {
    Value::from(path.to_string_lossy().into_owned())
}
