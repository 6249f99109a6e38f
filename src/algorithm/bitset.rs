use bitvec::prelude::*;

/// Fixed-size set of ids for marking slices or edges during a graph walk
///
/// Uses 0-based indexing to match slice and edge ids throughout the system.
/// Ids outside the capacity are ignored on insert and reported absent.
#[derive(Clone, Debug)]
pub struct VisitedSet {
    bits: BitVec,
}

impl VisitedSet {
    /// Create a set able to hold ids `0..capacity`, all unmarked
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Mark an id, returning `true` if it was not marked before
    pub fn insert(&mut self, id: usize) -> bool {
        if id >= self.bits.len() || self.contains(id) {
            return false;
        }
        self.bits.set(id, true);
        true
    }

    /// Test id membership
    pub fn contains(&self, id: usize) -> bool {
        self.bits.get(id).as_deref() == Some(&true)
    }

    /// Count marked ids
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Test if every id in the capacity is marked
    pub fn is_full(&self) -> bool {
        self.bits.all()
    }

    /// Ids that have not been marked, in ascending order
    pub fn missing(&self) -> Vec<usize> {
        self.bits.iter_zeros().collect()
    }
}
