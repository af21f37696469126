// Machine configuration shared by the parser, interpreter and CLI

/// Number of cells on the tape
pub const TAPE_LEN: usize = 128;

/// Deepest block nesting accepted by default (top-level blocks are depth 0)
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 1024;

/// Snapshot memory budget used by the time-travel viewer (256 MiB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;

/// Printable output range accepted by `.`
pub const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

/// Tunables for a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Deepest block nesting the parser and interpreter accept
    pub max_nesting_depth: usize,

    /// Snapshot memory limit in bytes; `None` disables history recording
    pub history_limit: Option<usize>,
}

impl MachineConfig {
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            history_limit: None,
        }
    }
}
