//! Pattern detection over file event streams.
//!
//! Given a list of raw filesystem events, [`PatternDetector`] recognizes
//! composite operations that a one-event-at-a-time view would miss:
//!
//! - **Rename sequences** - `A -> B`, `B -> C` collapsed into `A -> C`
//! - **Batch updates** - three or more related files in one directory
//!   created, modified or deleted within a few seconds
//! - **Backup creates** - a file moved aside to `*.bak` (or similar) and
//!   immediately recreated at its original path
//!
//! Detection is pure: no I/O, no shared state, and the input slice is only read.
//!
//! ```rust,ignore
//! use fsweave_core::load_events;
//! use fsweave_detect::PatternDetector;
//!
//! let events = load_events("session.jsonl")?;
//! let detector = PatternDetector::new();
//!
//! for op in detector.detect_all(&events) {
//!     println!("{}: {} ({:.0}%)", op.operation_type, op.description, op.confidence * 100.0);
//! }
//! ```
//!
//! # Naming conventions
//!
//! Backup and temp names are decided by a [`NameClassifier`]. The default
//! [`ConventionClassifier`] knows common editor and tool conventions;
//! [`GlobClassifier`] is built from the patterns in a [`DetectorConfig`], and
//! [`FnClassifier`] wraps two closures.

mod classify;
mod detector;
mod heuristics;

pub use classify::{
    ClassifierError, ConventionClassifier, FnClassifier, GlobClassifier, NameClassifier,
};
pub use detector::{
    BACKUP_CREATE_CONFIDENCE, BATCH_UPDATE_CONFIDENCE, PatternDetector,
    RENAME_SEQUENCE_CONFIDENCE,
};
pub use heuristics::{dominant_operation_type, files_are_related, longest_common_prefix};

// Re-export core types
pub use fsweave_core::{DetectorConfig, EventKind, FileEvent, FileOperation, OperationType};
