//! Shared color state: the dense node-to-color array and the set of colors
//! in use.

use std::iter;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::graph::NodeId;

/// A node color.
pub type Color = u32;

/// Marks a node that has never been validly colored. Never chosen, never
/// recorded as used.
pub const INITIAL_FORBIDDEN_COLOR: Color = u32::MAX;

/// Dense node-to-color array shared by all workers.
///
/// Every cell is a single atomic `u32`, so a concurrent read sees either the
/// previous or the new color, never a torn value. Writes to a node only come
/// from the worker whose batch holds it in the current iteration; readers
/// tolerate stale values, so all accesses are `Relaxed`. The iteration
/// barrier orders one iteration's writes before the next one's reads.
pub struct ColorStorage {
    colors: Vec<AtomicU32>,
}

impl ColorStorage {
    /// Allocates `nnodes` cells, all holding [`INITIAL_FORBIDDEN_COLOR`].
    pub fn new(nnodes: usize) -> Result<Self> {
        let mut colors = Vec::new();
        colors
            .try_reserve_exact(nnodes)
            .map_err(|_| Error::ResourceExhausted {
                what: "color array",
                len: nnodes,
            })?;
        colors.extend(iter::repeat_with(|| AtomicU32::new(INITIAL_FORBIDDEN_COLOR)).take(nnodes));
        Ok(Self { colors })
    }

    pub fn get(&self, node: NodeId) -> Color {
        self.colors[node as usize].load(Ordering::Relaxed)
    }

    pub fn set(&self, node: NodeId, color: Color) {
        self.colors[node as usize].store(color, Ordering::Relaxed)
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    /// Extracts the colors once no worker holds a reference.
    pub fn into_inner(self) -> Vec<Color> {
        self.colors.into_iter().map(|c| c.into_inner()).collect()
    }
}

/// The set of colors held by at least one node.
///
/// Workers each fill a local instance; the driver merges them with
/// [`UsedColors::merge`] on a single thread once the iteration is joined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsedColors {
    bits: BitSet,
}

impl UsedColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The colors occurring in `colors`, skipping uncolored nodes.
    pub fn from_colors(colors: &[Color]) -> Self {
        let mut used = Self::new();
        colors.iter().for_each(|&c| used.mark_used(c));
        used
    }

    pub fn mark_used(&mut self, color: Color) {
        if color != INITIAL_FORBIDDEN_COLOR {
            self.bits.insert(color);
        }
    }

    pub fn merge(&mut self, other: &UsedColors) {
        self.bits.union_with(&other.bits)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.bits.get(color)
    }

    pub fn count(&self) -> usize {
        self.bits.count()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Used colors in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.bits.iter()
    }
}
