//! Pairwise overlap search between slices
//!
//! Every unordered pair is compared by sliding the second slice over the first
//! across all offsets whose overlap is a border strip, keeping the offset with
//! the lowest mean pixel difference.

use crate::algorithm::graph::OverlapGraph;
use crate::algorithm::scoring::{Difference, ScoreLimits, overlap_difference};
use crate::io::configuration::{
    DEFAULT_MAX_OVERLAP, DEFAULT_MIN_OVERLAP_PIXELS, DEFAULT_MIN_SIMILARITY,
};
use crate::io::error::{CompositeError, Result, invalid_parameter};
use crate::spatial::{Offset, Rect, SliceId, SliceSet};
use tracing::{debug, info};

/// Thresholds that decide which offsets are searched and which pairs match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatorConfig {
    /// Minimum similarity for a pair's best offset to count as a match
    pub min_similarity: f64,
    /// Widest border strip, in pixels, searched between two slices
    pub max_overlap: u32,
    /// Fewest counted pixels an overlap must contain
    pub min_overlap_pixels: u32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_overlap: DEFAULT_MAX_OVERLAP,
            min_overlap_pixels: DEFAULT_MIN_OVERLAP_PIXELS,
        }
    }
}

impl LocatorConfig {
    /// Check every threshold is within its meaningful range
    ///
    /// # Errors
    ///
    /// Returns an error if `min_similarity` is outside `0.0..=1.0` or either
    /// pixel count is zero
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(invalid_parameter(
                "min_similarity",
                &self.min_similarity,
                &"must be between 0 and 1",
            ));
        }
        if self.max_overlap == 0 {
            return Err(invalid_parameter(
                "max_overlap",
                &self.max_overlap,
                &"must be at least one pixel",
            ));
        }
        if self.min_overlap_pixels == 0 {
            return Err(invalid_parameter(
                "min_overlap_pixels",
                &self.min_overlap_pixels,
                &"must be at least one pixel",
            ));
        }
        Ok(())
    }

    fn limits(&self) -> ScoreLimits {
        ScoreLimits {
            max_mean: 1.0 - self.min_similarity,
            min_pixels: self.min_overlap_pixels as u64,
        }
    }
}

/// Best alignment found between two slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapMatch {
    /// Slice the offset is measured from
    pub first: SliceId,
    /// Slice the offset is measured to
    pub second: SliceId,
    /// Top-left of `second` relative to top-left of `first`
    pub offset: Offset,
    /// Pixel difference over the overlap at `offset`
    pub difference: Difference,
}

impl OverlapMatch {
    /// Similarity of the overlap, `1.0` for identical pixels
    pub fn similarity(&self) -> f64 {
        self.difference.similarity()
    }
}

/// Offsets of an `other`-sized image over a `base`-sized image that form a border strip
///
/// Yields offsets in row-major order (y outer, x inner). An offset qualifies when
/// the overlap's narrower side is at most `max_overlap` and its area is at least
/// `min_pixels`.
pub fn candidate_offsets(
    base: (u32, u32),
    other: (u32, u32),
    max_overlap: u32,
    min_pixels: u64,
) -> impl Iterator<Item = Offset> {
    let base_rect = Rect::new(Offset::ZERO, base.0, base.1);
    let (other_w, other_h) = (i64::from(other.0), i64::from(other.1));
    let ys = (1 - other_h)..i64::from(base.1);
    let xs = (1 - other_w)..i64::from(base.0);

    ys.flat_map(move |y| xs.clone().map(move |x| Offset::new(x, y)))
        .filter(move |&offset| {
            base_rect
                .intersection(&Rect::new(offset, other.0, other.1))
                .is_some_and(|overlap| {
                    overlap.width.min(overlap.height) <= max_overlap && overlap.area() >= min_pixels
                })
        })
}

/// Searches slice pairs for their best alignment
pub struct Locator<'a> {
    slices: &'a SliceSet,
    config: LocatorConfig,
}

impl<'a> Locator<'a> {
    /// Create a locator over `slices`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(slices: &'a SliceSet, config: LocatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { slices, config })
    }

    /// Number of unordered pairs a full search compares
    pub fn pair_count(&self) -> usize {
        let n = self.slices.len();
        n * n.saturating_sub(1) / 2
    }

    /// Best alignment of `second` over `first`, if it clears the similarity threshold
    ///
    /// Equal scores are resolved in favour of the smaller offset magnitude, then
    /// the first offset in scan order.
    pub fn search_pair(&self, first: SliceId, second: SliceId) -> Option<OverlapMatch> {
        let base = self.slices.get(first)?;
        let other = self.slices.get(second)?;
        let limits = self.config.limits();

        let mut best: Option<(Difference, Offset)> = None;
        for offset in candidate_offsets(
            (base.width(), base.height()),
            (other.width(), other.height()),
            self.config.max_overlap,
            limits.min_pixels,
        ) {
            let Some(difference) =
                overlap_difference(base.pixels(), other.pixels(), offset, limits)
            else {
                continue;
            };

            let better = best.is_none_or(|(best_difference, best_offset)| {
                difference < best_difference
                    || (difference == best_difference
                        && offset.magnitude_squared() < best_offset.magnitude_squared())
            });
            if better {
                best = Some((difference, offset));
            }
        }

        let (difference, offset) = best?;
        (difference.similarity() >= self.config.min_similarity).then_some(OverlapMatch {
            first,
            second,
            offset,
            difference,
        })
    }

    /// Search every pair and build the overlap graph
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or the matches leave any slice
    /// unconnected
    pub fn locate(&self) -> Result<OverlapGraph> {
        self.locate_with(|_, _| {})
    }

    /// Search every pair, calling `on_pair` after each comparison
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty or the matches leave any slice
    /// unconnected
    pub fn locate_with<F>(&self, mut on_pair: F) -> Result<OverlapGraph>
    where
        F: FnMut(SliceId, SliceId),
    {
        let count = self.slices.len();
        if count == 0 {
            return Err(invalid_parameter(
                "slices",
                &count,
                &"at least one slice is required",
            ));
        }

        let mut graph = OverlapGraph::new(count);
        for first in 0..count {
            for second in first + 1..count {
                if let Some(overlap) = self.search_pair(first, second) {
                    debug!(
                        first = self.slices.name(first),
                        second = self.slices.name(second),
                        offset = %overlap.offset,
                        similarity = overlap.similarity(),
                        "Matched slice pair"
                    );
                    graph.add_match(overlap);
                }
                on_pair(first, second);
            }
        }

        info!(
            slices = count,
            matches = graph.edge_count(),
            "Overlap search finished"
        );

        let origin = graph.most_connected().unwrap_or_default();
        let reached = graph.reachable_from(origin);
        // Fewer than count - 1 edges can never reach every slice
        if !reached.is_full() {
            return Err(CompositeError::InsufficientOverlap {
                slices: count,
                matches: graph.edge_count(),
                unplaced: reached
                    .missing()
                    .into_iter()
                    .map(|id| self.slices.name(id).to_string())
                    .collect(),
            });
        }

        Ok(graph)
    }
}
