//! Per-worker scratch set of colors a node may not take.

use crate::bitset::BitSet;
use crate::storage::{Color, INITIAL_FORBIDDEN_COLOR};

/// Reused across nodes by one worker. Resetting only touches the colors
/// forbidden since the last reset, so the cost follows the node's degree
/// rather than the number of colors seen so far.
pub struct ForbiddenColorSet {
    bits: BitSet,
    touched: Vec<Color>,
}

impl ForbiddenColorSet {
    pub fn new() -> Self {
        Self {
            bits: BitSet::new(),
            touched: Vec::new(),
        }
    }

    /// Prepares for a node with `degree` relationships.
    pub fn reset(&mut self, degree: u32) {
        for c in self.touched.drain(..) {
            self.bits.remove(c);
        }
        self.touched.reserve(degree as usize);
    }

    pub fn forbid(&mut self, color: Color) {
        if color != INITIAL_FORBIDDEN_COLOR && self.bits.insert(color) {
            self.touched.push(color);
        }
    }

    /// The smallest color that is neither forbidden nor the sentinel.
    pub fn smallest_allowed(&self) -> Color {
        let color = self.bits.next_clear(0);
        debug_assert!(color != INITIAL_FORBIDDEN_COLOR);
        color
    }
}

impl Default for ForbiddenColorSet {
    fn default() -> Self {
        Self::new()
    }
}
