// Snapshot management for reverse execution

use crate::interpreter::errors::RuntimeError;
use crate::memory::MachineState;
use crate::parser::ast::{BlockKind, NodeId, SourceLocation};

/// Everything the program has written with `.`, in order
///
/// Only printable ASCII can be emitted, so byte offsets and character
/// offsets into [`Transcript::text`] are the same.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript {
            text: String::new(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The block that just finished when a snapshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPoint {
    pub block: NodeId,
    pub kind: BlockKind,
    pub location: SourceLocation,
    pub depth: usize,
    /// Conditional whose guard cell was zero
    pub skipped: bool,
}

/// Snapshot of execution state
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub state: MachineState,
    /// `None` for the initial snapshot taken before any block ran
    pub point: Option<ExecutionPoint>,
    /// Length of the transcript at this point
    pub output_len: usize,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Snapshot>()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), RuntimeError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(RuntimeError::SnapshotLimitExceeded {
                current: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Snapshot {
        Snapshot {
            state: MachineState::new(),
            point: None,
            output_len: 0,
        }
    }

    #[test]
    fn test_push_within_limit() {
        let size = blank().estimated_size();
        let mut manager = SnapshotManager::new(size * 2);
        manager.push(blank()).unwrap();
        manager.push(blank()).unwrap();
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), size * 2);
        assert_eq!(manager.memory_limit(), size * 2);
    }

    #[test]
    fn test_push_over_limit_fails() {
        let size = blank().estimated_size();
        let mut manager = SnapshotManager::new(size + size / 2);
        manager.push(blank()).unwrap();
        let err = manager.push(blank()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::SnapshotLimitExceeded { current, .. } if current == size
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_transcript_records_in_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        for c in "Hi!".chars() {
            transcript.push(c);
        }
        assert_eq!(transcript.text(), "Hi!");
        assert_eq!(transcript.len(), 3);
    }
}
