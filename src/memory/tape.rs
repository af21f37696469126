//! Fixed-size wrapping tape
//!
//! The tape is [`TAPE_LEN`] unsigned 8-bit cells addressed by a pointer.
//! Cell arithmetic wraps modulo 256 and pointer movement wraps modulo
//! [`TAPE_LEN`], so neither can leave its range no matter how large the
//! adjustment.

use crate::config::TAPE_LEN;

/// Cells plus the pointer into them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tape {
    cells: [u8; TAPE_LEN],
    pointer: usize,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            cells: [0; TAPE_LEN],
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8; TAPE_LEN] {
        &self.cells
    }

    /// Value of the cell under the pointer
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Add a signed amount to the current cell, wrapping modulo 256
    pub fn add_to_current(&mut self, amount: i64) {
        let delta = amount.rem_euclid(256) as u8;
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(delta);
    }

    /// Move the pointer by a signed offset, wrapping around the tape
    pub fn move_pointer(&mut self, offset: i64) {
        let len = TAPE_LEN as i64;
        let offset = offset.rem_euclid(len);
        self.pointer = ((self.pointer as i64 + offset) % len) as usize;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_is_zeroed() {
        let tape = Tape::new();
        assert_eq!(tape.pointer(), 0);
        assert!(tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_add_wraps_both_directions() {
        let mut tape = Tape::new();
        tape.add_to_current(-1);
        assert_eq!(tape.current(), 255);
        tape.add_to_current(2);
        assert_eq!(tape.current(), 1);
        tape.add_to_current(256 * 7 + 5);
        assert_eq!(tape.current(), 6);
        tape.add_to_current(i64::MIN);
        assert_eq!(tape.current(), 6);
    }

    #[test]
    fn test_pointer_wraps_left_and_right() {
        let mut tape = Tape::new();
        tape.move_pointer(-1);
        assert_eq!(tape.pointer(), 127);
        tape.move_pointer(1);
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_pointer_stays_in_range_for_large_offsets() {
        let mut tape = Tape::new();
        for offset in [-1000i64, -129, -128, 128, 129, 1000, i64::MAX, i64::MIN] {
            let before = tape.pointer() as i64;
            tape.move_pointer(offset);
            assert!(tape.pointer() < TAPE_LEN);
            assert_eq!(
                tape.pointer() as i64,
                (before as i128 + offset as i128).rem_euclid(128) as i64
            );
        }
    }

    #[test]
    fn test_cells_are_independent() {
        let mut tape = Tape::new();
        tape.set_current(42);
        tape.move_pointer(3);
        tape.set_current(7);
        assert_eq!(tape.cells()[0], 42);
        assert_eq!(tape.cells()[3], 7);
    }
}
