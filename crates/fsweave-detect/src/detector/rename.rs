//! Rename chains: `A -> B`, `B -> C`, ... collapsed into one logical rename.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use serde_json::Value;

use fsweave_core::{FileEvent, FileOperation, OperationType};

use super::{OperationDraft, PatternDetector, RENAME_SEQUENCE_CONFIDENCE, path_value};
use crate::classify::NameClassifier;

/// Move events indexed by both ends, each list in input order.
struct MoveGraph<'a> {
    moves: Vec<&'a FileEvent>,
    by_source: HashMap<&'a Path, Vec<usize>>,
    by_dest: HashMap<&'a Path, Vec<usize>>,
}

impl<'a> MoveGraph<'a> {
    fn new(events: &'a [FileEvent]) -> Self {
        let moves: Vec<&FileEvent> = events.iter().filter(|e| e.is_move()).collect();
        let mut by_source: HashMap<&Path, Vec<usize>> = HashMap::new();
        let mut by_dest: HashMap<&Path, Vec<usize>> = HashMap::new();

        for (idx, event) in moves.iter().enumerate() {
            by_source.entry(event.path.as_path()).or_default().push(idx);
            if let Some(dest) = event.dest_path.as_deref() {
                by_dest.entry(dest).or_default().push(idx);
            }
        }

        Self {
            moves,
            by_source,
            by_dest,
        }
    }

    fn first_unvisited(
        index: &HashMap<&Path, Vec<usize>>,
        key: &Path,
        visited: &HashSet<usize>,
    ) -> Option<usize> {
        index
            .get(key)?
            .iter()
            .copied()
            .find(|idx| !visited.contains(idx))
    }

    /// Grow a chain around `seed` in both directions until no move connects.
    fn chain_from(&self, seed: usize) -> VecDeque<usize> {
        let mut chain = VecDeque::from([seed]);
        let mut visited = HashSet::from([seed]);

        // Backwards: who moved something onto our earliest source?
        let mut earliest = self.moves[seed].path.as_path();
        while let Some(prev) = Self::first_unvisited(&self.by_dest, earliest, &visited) {
            visited.insert(prev);
            chain.push_front(prev);
            earliest = self.moves[prev].path.as_path();
        }

        // Forwards: who moved our latest destination somewhere else?
        let mut latest = self.moves[seed].dest_path.as_deref();
        while let Some(next) =
            latest.and_then(|dest| Self::first_unvisited(&self.by_source, dest, &visited))
        {
            visited.insert(next);
            chain.push_back(next);
            latest = self.moves[next].dest_path.as_deref();
        }

        chain
    }
}

impl<C: NameClassifier> PatternDetector<C> {
    /// Find the longest chain of moves where each move starts where the previous one ended.
    ///
    /// Returns `None` when there are fewer than two moves or no chain reaches
    /// the configured minimum length.
    pub fn detect_rename_sequence(&self, events: &[FileEvent]) -> Option<FileOperation> {
        let graph = MoveGraph::new(events);
        if graph.moves.len() < 2 {
            return None;
        }

        let min_len = self.config.min_chain_length;
        let mut best: Option<VecDeque<usize>> = None;
        for seed in 0..graph.moves.len() {
            let chain = graph.chain_from(seed);
            let longer = best.as_ref().is_none_or(|b| chain.len() > b.len());
            if chain.len() >= min_len && longer {
                best = Some(chain);
            }
        }

        let Some(best) = best else {
            tracing::trace!(moves = graph.moves.len(), "no rename chain found");
            return None;
        };

        let mut chain: Vec<FileEvent> = best.iter().map(|&idx| graph.moves[idx].clone()).collect();
        chain.sort_by_key(|e| e.timestamp);

        let first = chain.first()?;
        let last = chain.last()?;
        let original = first.path.clone();
        let primary_path = last.target().to_path_buf();
        let chain_length = chain.len();

        tracing::debug!(
            from = %original.display(),
            to = %primary_path.display(),
            chain_length,
            "detected rename sequence"
        );

        OperationDraft {
            operation_type: OperationType::RenameSequence,
            description: format!(
                "Renamed {} to {} in {} steps",
                original.display(),
                primary_path.display(),
                chain_length
            ),
            files_affected: vec![primary_path.clone()],
            primary_path,
            events: chain,
            confidence: RENAME_SEQUENCE_CONFIDENCE,
            is_atomic: true,
            pattern: "rename_sequence",
        }
        .finish([
            ("original_path", path_value(&original)),
            ("chain_length", Value::from(chain_length)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::path::PathBuf;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_needs_two_moves() {
        let detector = PatternDetector::new();
        let events = vec![
            FileEvent::moved("/a", "/b", at(0)),
            FileEvent::created("/b", at(1)),
            FileEvent::modified("/b", at(2)),
        ];
        assert!(detector.detect_rename_sequence(&events).is_none());
        assert!(detector.detect_rename_sequence(&[]).is_none());
    }

    #[test]
    fn test_unconnected_moves() {
        let events = vec![
            FileEvent::moved("/a", "/b", at(0)),
            FileEvent::moved("/c", "/d", at(1)),
        ];
        assert!(PatternDetector::new().detect_rename_sequence(&events).is_none());
    }

    #[test]
    fn test_simple_chain() {
        let events = vec![
            FileEvent::moved("/w/A.txt", "/w/B.txt", at(0)),
            FileEvent::moved("/w/B.txt", "/w/C.txt", at(1)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();

        assert_eq!(op.operation_type, OperationType::RenameSequence);
        assert_eq!(op.events.len(), 2);
        assert_eq!(op.events, events);
        assert_eq!(op.primary_path, PathBuf::from("/w/C.txt"));
        assert_eq!(op.files_affected, vec![PathBuf::from("/w/C.txt")]);
        assert_eq!(op.metadata_u64("chain_length"), Some(2));
        assert_eq!(op.metadata_str("original_path"), Some("/w/A.txt"));
        assert_eq!(op.pattern(), Some("rename_sequence"));
        assert_eq!(op.confidence, RENAME_SEQUENCE_CONFIDENCE);
        assert!(op.is_atomic);
        assert!(op.is_safe);
        assert!(!op.has_backup);
        assert_eq!(op.start_time, at(0));
        assert_eq!(op.end_time, at(1));
    }

    #[test]
    fn test_chain_is_sorted_chronologically() {
        // Listed out of order; the result follows the timestamps
        let events = vec![
            FileEvent::moved("/w/b", "/w/c", at(5)),
            FileEvent::moved("/w/a", "/w/b", at(1)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        assert_eq!(op.events[0].path, PathBuf::from("/w/a"));
        assert_eq!(op.events[1].path, PathBuf::from("/w/b"));
        assert_eq!(op.primary_path, PathBuf::from("/w/c"));
    }

    #[test]
    fn test_long_chain_is_followed_to_the_end() {
        // Seeding from the middle must still reach both ends
        let events = vec![
            FileEvent::moved("/w/3", "/w/4", at(3)),
            FileEvent::moved("/w/1", "/w/2", at(1)),
            FileEvent::moved("/w/4", "/w/5", at(4)),
            FileEvent::moved("/w/0", "/w/1", at(0)),
            FileEvent::moved("/w/2", "/w/3", at(2)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        assert_eq!(op.metadata_u64("chain_length"), Some(5));
        assert_eq!(op.metadata_str("original_path"), Some("/w/0"));
        assert_eq!(op.primary_path, PathBuf::from("/w/5"));
    }

    #[test]
    fn test_longest_chain_wins() {
        let events = vec![
            FileEvent::moved("/x/a", "/x/b", at(0)),
            FileEvent::moved("/x/b", "/x/c", at(1)),
            FileEvent::moved("/y/1", "/y/2", at(2)),
            FileEvent::moved("/y/2", "/y/3", at(3)),
            FileEvent::moved("/y/3", "/y/4", at(4)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        assert_eq!(op.metadata_u64("chain_length"), Some(3));
        assert_eq!(op.primary_path, PathBuf::from("/y/4"));
    }

    #[test]
    fn test_equal_chains_first_wins() {
        let events = vec![
            FileEvent::moved("/x/a", "/x/b", at(0)),
            FileEvent::moved("/x/b", "/x/c", at(1)),
            FileEvent::moved("/y/a", "/y/b", at(2)),
            FileEvent::moved("/y/b", "/y/c", at(3)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        assert_eq!(op.primary_path, PathBuf::from("/x/c"));
    }

    #[test]
    fn test_cycle_terminates() {
        let events = vec![
            FileEvent::moved("/w/a", "/w/b", at(0)),
            FileEvent::moved("/w/b", "/w/a", at(1)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        assert_eq!(op.metadata_u64("chain_length"), Some(2));
        assert_eq!(op.primary_path, PathBuf::from("/w/a"));
    }

    #[test]
    fn test_move_without_destination_ends_chain() {
        let events = vec![
            FileEvent::moved("/w/a", "/w/b", at(0)),
            FileEvent::new("/w/b", None, fsweave_core::EventKind::Moved, at(1)),
        ];
        let op = PatternDetector::new().detect_rename_sequence(&events).unwrap();
        // The last move has no destination, so its source is the outcome
        assert_eq!(op.primary_path, PathBuf::from("/w/b"));
    }
}
