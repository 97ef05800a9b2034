//! Raw filesystem change events.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of filesystem change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// A file appeared at `path`.
    Created,
    /// The contents of `path` changed.
    Modified,
    /// `path` was removed.
    Deleted,
    /// `path` was moved to `dest_path`.
    Moved,
}

/// A single observed filesystem change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileEvent {
    /// Path the event concerns (the source, for moves).
    pub path: PathBuf,
    /// Destination of a move. `None` for every other kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_path: Option<PathBuf>,
    /// What happened.
    pub event_type: EventKind,
    /// When the change was observed.
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    /// Create a new event.
    pub fn new(
        path: impl Into<PathBuf>,
        dest_path: Option<PathBuf>,
        event_type: EventKind,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            dest_path,
            event_type,
            timestamp,
        }
    }

    /// Create a `created` event.
    pub fn created(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(path, None, EventKind::Created, timestamp)
    }

    /// Create a `modified` event.
    pub fn modified(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(path, None, EventKind::Modified, timestamp)
    }

    /// Create a `deleted` event.
    pub fn deleted(path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self::new(path, None, EventKind::Deleted, timestamp)
    }

    /// Create a `moved` event from `from` to `to`.
    pub fn moved(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(from, Some(to.into()), EventKind::Moved, timestamp)
    }

    /// Check if this is a move event.
    pub fn is_move(&self) -> bool {
        self.event_type == EventKind::Moved
    }

    /// Check if this event changes content in place (create, modify, delete).
    pub fn is_content_change(&self) -> bool {
        matches!(
            self.event_type,
            EventKind::Created | EventKind::Modified | EventKind::Deleted
        )
    }

    /// Where the file ends up: the move destination, or `path` when there is none.
    pub fn target(&self) -> &Path {
        self.dest_path.as_deref().unwrap_or(&self.path)
    }

    /// Parent directory of `path`. Bare file names yield an empty path.
    pub fn parent_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}
