//! A growable bitset over `u32` indices, backed by a `bitvec` of `u64` words.

use bitvec::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitSet {
    bits: BitVec<u64, Lsb0>,
}

impl BitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set able to hold `[0, nbits)` without growing.
    pub fn with_capacity(nbits: usize) -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; nbits],
        }
    }

    /// Like [`BitSet::with_capacity`], but reports allocation failure
    /// instead of aborting.
    pub fn try_with_capacity(nbits: usize) -> Option<Self> {
        let nwords = (nbits + 63) / 64;
        let mut words: Vec<u64> = Vec::new();
        words.try_reserve_exact(nwords).ok()?;
        words.resize(nwords, 0);
        Some(Self {
            bits: BitVec::from_vec(words),
        })
    }

    pub fn get(&self, i: u32) -> bool {
        self.bits.get(i as usize).map_or(false, |bit| *bit)
    }

    /// Sets bit `i`, growing as needed. Returns whether it was previously unset.
    pub fn insert(&mut self, i: u32) -> bool {
        let i = i as usize;
        if i >= self.bits.len() {
            self.bits.resize(i + 1, false);
        }
        let fresh = !self.bits[i];
        self.bits.set(i, true);
        fresh
    }

    pub fn remove(&mut self, i: u32) {
        let i = i as usize;
        if i < self.bits.len() {
            self.bits.set(i, false);
        }
    }

    /// Unsets every bit, keeping the allocation.
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// The smallest unset index that is `>= from`.
    pub fn next_clear(&self, from: u32) -> u32 {
        let start = from as usize;
        if start >= self.bits.len() {
            return from;
        }
        let found = self.bits[start..]
            .first_zero()
            .map_or(self.bits.len(), |i| start + i);
        found as u32
    }

    /// In-place union. Commutative, so merge order never matters.
    pub fn union_with(&mut self, other: &BitSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.resize(other.bits.len(), false);
        }
        for i in other.bits.iter_ones() {
            self.bits.set(i, true);
        }
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Set indices in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter_ones().map(|i| i as u32)
    }
}
