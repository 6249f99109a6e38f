//! Undirected overlap graph keyed by slice id

use crate::algorithm::bitset::VisitedSet;
use crate::algorithm::locator::OverlapMatch;
use crate::spatial::{Offset, SliceId};
use std::collections::VecDeque;

/// One step across a matched edge, seen from the slice being expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Index of the edge in [`OverlapGraph::edges`]
    pub edge: usize,
    /// Slice at the far end of the edge
    pub slice: SliceId,
    /// Position of `slice` relative to the slice being expanded
    pub offset: Offset,
}

/// Matched slice pairs stored as an edge list plus per-slice adjacency
///
/// Adjacency lists keep insertion order, so a graph built from pairs searched
/// in id order is walked in the same order on every run.
#[derive(Debug, Clone, Default)]
pub struct OverlapGraph {
    edges: Vec<OverlapMatch>,
    adjacency: Vec<Vec<usize>>,
}

impl OverlapGraph {
    /// Create a graph over `slice_count` slices with no edges
    pub fn new(slice_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); slice_count],
        }
    }

    /// Add a matched pair
    ///
    /// Returns `false` and leaves the graph unchanged if either id is out of
    /// range or both ends name the same slice.
    pub fn add_match(&mut self, overlap: OverlapMatch) -> bool {
        let count = self.adjacency.len();
        if overlap.first == overlap.second || overlap.first >= count || overlap.second >= count
        {
            return false;
        }

        let edge = self.edges.len();
        for id in [overlap.first, overlap.second] {
            if let Some(list) = self.adjacency.get_mut(id) {
                list.push(edge);
            }
        }
        self.edges.push(overlap);
        true
    }

    /// Number of slices the graph spans
    pub fn slice_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of matched pairs
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All matched pairs in insertion order
    pub fn edges(&self) -> &[OverlapMatch] {
        &self.edges
    }

    /// Number of matches a slice takes part in
    pub fn degree(&self, id: SliceId) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    /// Slices matched with `id`, with offsets oriented away from `id`
    pub fn neighbors(&self, id: SliceId) -> impl Iterator<Item = Neighbor> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(move |&edge| {
                let overlap = self.edges.get(edge)?;
                if overlap.first == id {
                    Some(Neighbor {
                        edge,
                        slice: overlap.second,
                        offset: overlap.offset,
                    })
                } else {
                    Some(Neighbor {
                        edge,
                        slice: overlap.first,
                        offset: -overlap.offset,
                    })
                }
            })
    }

    /// Slice with the most matches; ties go to the lowest id
    pub fn most_connected(&self) -> Option<SliceId> {
        (0..self.slice_count()).max_by(|&a, &b| self.degree(a).cmp(&self.degree(b)).then(b.cmp(&a)))
    }

    /// Slices reachable from `origin` by following matches
    pub fn reachable_from(&self, origin: SliceId) -> VisitedSet {
        let mut visited = VisitedSet::new(self.slice_count());
        let mut queue = VecDeque::new();

        if visited.insert(origin) {
            queue.push_back(origin);
        }

        while let Some(id) = queue.pop_front() {
            for neighbor in self.neighbors(id) {
                if visited.insert(neighbor.slice) {
                    queue.push_back(neighbor.slice);
                }
            }
        }

        visited
    }
}
