//! Core types for fsweave.
//!
//! This crate holds the data model shared by the detector and the CLI:
//! raw [`FileEvent`]s, reconstructed [`FileOperation`]s, the
//! [`DetectorConfig`] and loaders for recorded event logs.

mod config;
mod error;
mod event;
mod log;
mod operation;

pub use config::{
    DEFAULT_BACKUP_PATTERNS, DEFAULT_TEMP_PATTERNS, DetectorConfig, DetectorConfigBuilder,
    DetectorConfigBuilderError,
};
pub use error::{ConfigError, EventLogError};
pub use event::{EventKind, FileEvent};
pub use log::{load_events, parse_events};
pub use operation::{FileOperation, OperationMetadata, OperationType};
