//! Higher-level operations reconstructed from raw events.

use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::FileEvent;

/// Kind of composite operation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationType {
    /// A chain of moves collapsed into one logical rename.
    RenameSequence,
    /// Several related files in one directory changed together.
    BatchUpdate,
    /// A file was moved aside to a backup name and recreated.
    BackupCreate,
    /// Fallback label for modification-dominated clusters.
    AtomicSave,
    /// Fallback label for deletion-dominated clusters.
    TempCleanup,
}

/// Auxiliary data attached to an operation by the heuristic that produced it.
pub type OperationMetadata = IndexMap<String, Value>;

/// A composite operation recognized in an event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOperation {
    /// What kind of operation this is.
    pub operation_type: OperationType,
    /// Path that best represents the outcome.
    pub primary_path: PathBuf,
    /// Constituent events in chronological order.
    pub events: Vec<FileEvent>,
    /// Heuristic certainty in `[0, 1]`.
    pub confidence: f64,
    /// Human-readable summary.
    pub description: String,
    /// Timestamp of the first event.
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last event.
    pub end_time: DateTime<Utc>,
    /// Whether the operation is one indivisible unit.
    pub is_atomic: bool,
    /// Whether the operation is non-destructive.
    pub is_safe: bool,
    /// Whether a backup file was left behind.
    #[serde(default)]
    pub has_backup: bool,
    /// Paths touched by the operation.
    pub files_affected: Vec<PathBuf>,
    /// Heuristic-specific data (`pattern`, `chain_length`, ...).
    #[serde(default)]
    pub metadata: OperationMetadata,
}

impl FileOperation {
    /// Time between the first and last constituent event.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    /// Number of constituent events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Look up a string metadata entry.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Look up an integer metadata entry.
    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(Value::as_u64)
    }

    /// Name of the heuristic that produced this operation.
    pub fn pattern(&self) -> Option<&str> {
        self.metadata_str("pattern")
    }
}
