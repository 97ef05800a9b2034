//! Small heuristics shared by the detectors.

use std::ffi::OsStr;
use std::path::Path;

use indexmap::IndexMap;

use fsweave_core::{EventKind, FileEvent, OperationType};

/// Check whether a group of events plausibly belongs to one coordinated change.
///
/// Files are related when every path shares the same non-empty extension, or
/// when the stems of the first two paths (case-folded) share a prefix of at
/// least `min_prefix_len` characters. Fewer than two events are never related.
pub fn files_are_related(events: &[FileEvent], min_prefix_len: usize) -> bool {
    let [first, second, ..] = events else {
        return false;
    };

    if let Some(ext) = first.path.extension().filter(|e| !e.is_empty())
        && events.iter().all(|e| e.path.extension() == Some(ext))
    {
        return true;
    }

    let stems = [stem(&first.path), stem(&second.path)];
    longest_common_prefix(&stems).chars().count() >= min_prefix_len
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or_default()
        .to_lowercase()
}

/// Longest prefix shared by every string, compared character by character.
pub fn longest_common_prefix<S: AsRef<str>>(strings: &[S]) -> String {
    let Some((first, rest)) = strings.split_first() else {
        return String::new();
    };
    let first = first.as_ref();

    let mut end = first.len();
    for other in rest {
        let shared: usize = first
            .chars()
            .zip(other.as_ref().chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum();
        end = end.min(shared);
    }
    first[..end].to_string()
}

/// Rough label for an arbitrary cluster, from its most frequent event kind.
///
/// Ties go to the kind seen first. An empty cluster is labelled a batch update.
pub fn dominant_operation_type(events: &[FileEvent]) -> OperationType {
    let mut counts: IndexMap<EventKind, usize> = IndexMap::new();
    for event in events {
        *counts.entry(event.event_type).or_default() += 1;
    }

    // max_by_key keeps the last maximum, so walk in reverse to keep the first
    let dominant = counts
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(kind, _)| *kind);

    match dominant {
        Some(EventKind::Created) => OperationType::BackupCreate,
        Some(EventKind::Modified) => OperationType::AtomicSave,
        Some(EventKind::Deleted) => OperationType::TempCleanup,
        Some(EventKind::Moved) => OperationType::RenameSequence,
        None => OperationType::BatchUpdate,
    }
}
