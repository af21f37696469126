//! Memory model for the tape machine
//!
//! This module provides the machine state mutated by the interpreter:
//! - [`tape`]: 128 wrapping 8-bit cells and the pointer into them
//! - [`MachineState`]: the tape plus the instruction counter
//!
//! # Pointer Movement
//!
//! After every executed block the pointer moves exactly once. A non-zero
//! block-local override (the sum of its `^`/`v` effects) wins; otherwise the
//! parity of the freshly incremented instruction counter decides:
//! ```text
//! odd  →  pointer - 1
//! even →  pointer + 1
//! ```

pub mod tape;

use tape::Tape;

/// Complete mutable state of one run
///
/// Small enough to copy into every history snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MachineState {
    pub tape: Tape,
    pub instruction_counter: u64,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> usize {
        self.tape.pointer()
    }

    /// Count one executed block and move the pointer for it
    pub fn finish_instruction(&mut self, pointer_override: i64) {
        self.instruction_counter += 1;
        self.apply_pointer_movement(pointer_override);
    }

    /// Move the pointer after a block, using the current counter's parity
    /// when there is no override
    pub fn apply_pointer_movement(&mut self, pointer_override: i64) {
        if pointer_override != 0 {
            self.tape.move_pointer(pointer_override);
        } else if self.instruction_counter % 2 == 1 {
            self.tape.move_pointer(-1);
        } else {
            self.tape.move_pointer(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_movement_alternates() {
        let mut state = MachineState::new();
        state.finish_instruction(0);
        assert_eq!(state.instruction_counter, 1);
        assert_eq!(state.pointer(), 127);
        state.finish_instruction(0);
        assert_eq!(state.instruction_counter, 2);
        assert_eq!(state.pointer(), 0);
    }

    #[test]
    fn test_override_replaces_default() {
        let mut state = MachineState::new();
        state.finish_instruction(3);
        assert_eq!(state.pointer(), 3);
        state.finish_instruction(-300);
        assert_eq!(state.pointer(), (3i64 - 300).rem_euclid(128) as usize);
    }
}
