//! Pixel difference scoring over the overlap of two placed images
//!
//! Scores are kept as integer totals so two candidate offsets compare exactly,
//! which keeps the locator deterministic across platforms.

use crate::io::configuration::{ALPHA_OPAQUE_THRESHOLD, MAX_PIXEL_DIFFERENCE};
use crate::spatial::{Offset, Rect};
use image::RgbaImage;
use std::cmp::Ordering;

/// Accumulated difference over the counted pixels of one overlap
#[derive(Debug, Clone, Copy)]
pub struct Difference {
    total: u64,
    pixels: u64,
}

impl Difference {
    /// Create a difference from a summed total and the number of pixels counted
    pub const fn new(total: u64, pixels: u64) -> Self {
        Self { total, pixels }
    }

    /// Summed per-pixel difference units
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Pixels that contributed to the total
    pub const fn pixels(&self) -> u64 {
        self.pixels
    }

    /// Mean difference normalised to `0.0..=1.0`; 1.0 when nothing was counted
    pub fn mean(&self) -> f64 {
        let (total, pixels) = self.ratio();
        total as f64 / (pixels as f64 * MAX_PIXEL_DIFFERENCE as f64)
    }

    /// Complement of [`Self::mean`]
    pub fn similarity(&self) -> f64 {
        1.0 - self.mean()
    }

    // An empty overlap ranks as the worst possible score
    const fn ratio(&self) -> (u64, u64) {
        if self.pixels == 0 {
            (MAX_PIXEL_DIFFERENCE, 1)
        } else {
            (self.total, self.pixels)
        }
    }
}

impl PartialEq for Difference {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Difference {}

impl PartialOrd for Difference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Difference {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_total, a_pixels) = self.ratio();
        let (b_total, b_pixels) = other.ratio();
        (u128::from(a_total) * u128::from(b_pixels))
            .cmp(&(u128::from(b_total) * u128::from(a_pixels)))
    }
}

/// Limits applied while scoring one candidate offset
#[derive(Debug, Clone, Copy)]
pub struct ScoreLimits {
    /// Mean difference above which scoring stops early
    pub max_mean: f64,
    /// Fewest counted pixels for the overlap to be scored at all
    pub min_pixels: u64,
}

/// Difference units between two RGBA pixels
///
/// Returns `None` when both pixels are transparent, since such pixels say
/// nothing about alignment. One opaque pixel against a transparent one costs
/// the maximum; two opaque pixels cost the sum of their RGB channel differences.
pub fn pixel_difference(a: &[u8], b: &[u8]) -> Option<u64> {
    let (&[ar, ag, ab, aa], &[br, bg, bb, ba]) = (a, b) else {
        return Some(MAX_PIXEL_DIFFERENCE);
    };

    match (aa >= ALPHA_OPAQUE_THRESHOLD, ba >= ALPHA_OPAQUE_THRESHOLD) {
        (false, false) => None,
        (true, true) => Some(
            u64::from(ar.abs_diff(br)) + u64::from(ag.abs_diff(bg)) + u64::from(ab.abs_diff(bb)),
        ),
        _ => Some(MAX_PIXEL_DIFFERENCE),
    }
}

/// Score `other` placed at `offset` relative to `base`'s top-left corner
///
/// Only the overlapping region is compared. Returns `None` if the images do
/// not overlap, if the running total proves the mean must exceed
/// `limits.max_mean`, or if fewer than `limits.min_pixels` pixels were counted.
pub fn overlap_difference(
    base: &RgbaImage,
    other: &RgbaImage,
    offset: Offset,
    limits: ScoreLimits,
) -> Option<Difference> {
    let base_rect = Rect::new(Offset::ZERO, base.width(), base.height());
    let other_rect = Rect::new(offset, other.width(), other.height());
    let overlap = base_rect.intersection(&other_rect)?;

    // Counted pixels never exceed the area, so this bound is safe to prune on
    let budget = limits.max_mean * MAX_PIXEL_DIFFERENCE as f64 * overlap.area() as f64;
    let row_len = overlap.width as usize * 4;
    let base_raw = base.as_raw();
    let other_raw = other.as_raw();

    let mut total = 0u64;
    let mut pixels = 0u64;

    for row in 0..i64::from(overlap.height) {
        let base_y = overlap.origin.y + row;
        let other_y = base_y - offset.y;
        let other_x = overlap.origin.x - offset.x;

        let base_start =
            (base_y as usize * base.width() as usize + overlap.origin.x as usize) * 4;
        let other_start = (other_y as usize * other.width() as usize + other_x as usize) * 4;

        let base_row = base_raw.get(base_start..base_start + row_len)?;
        let other_row = other_raw.get(other_start..other_start + row_len)?;

        for (a, b) in base_row.chunks_exact(4).zip(other_row.chunks_exact(4)) {
            if let Some(diff) = pixel_difference(a, b) {
                total += diff;
                pixels += 1;
            }
        }

        if total as f64 > budget {
            return None;
        }
    }

    (pixels >= limits.min_pixels).then_some(Difference::new(total, pixels))
}
