//! Canvas placement and rendering
//!
//! Absolute offsets are propagated breadth-first from an origin slice, so each
//! slice is positioned along its shortest match path. Edges that close a cycle
//! are checked against the offset already assigned and reported when they
//! disagree, but never change it.

use crate::algorithm::bitset::VisitedSet;
use crate::algorithm::graph::OverlapGraph;
use crate::io::configuration::DEFAULT_OFFSET_TOLERANCE;
use crate::io::error::{CompositeError, Result, invalid_layout, invalid_parameter};
use crate::io::layout::{LayoutRecord, Placement};
use crate::spatial::{Offset, Rect, SliceSet};
use image::RgbaImage;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info};

/// Tolerances applied while propagating placements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Largest Chebyshev disagreement between two placement paths left unreported
    pub offset_tolerance: u32,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            offset_tolerance: DEFAULT_OFFSET_TOLERANCE,
        }
    }
}

/// Two match paths placed the same slice at different offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InconsistentOverlap {
    /// Slice whose position is disputed
    pub slice: String,
    /// Neighbour whose match produced the conflicting offset
    pub neighbor: String,
    /// Offset assigned first, and kept
    pub placed: Offset,
    /// Offset implied by the conflicting match
    pub computed: Offset,
    /// Chebyshev distance between the two offsets
    pub disagreement: u64,
}

impl fmt::Display for InconsistentOverlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inconsistent overlap for '{}': placed at {}, match with '{}' implies {} ({} px apart)",
            self.slice, self.placed, self.neighbor, self.computed, self.disagreement
        )
    }
}

/// Placement result: the layout plus any conflicts found on the way
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Canvas size and every placement
    pub layout: LayoutRecord,
    /// Conflicting offsets, in discovery order
    pub warnings: Vec<InconsistentOverlap>,
}

/// Convert an overlap graph into absolute placements on one canvas
///
/// The origin is the slice with the most matches (lowest id on ties). The
/// canvas is the bounding box of all placed slices, shifted so its top-left
/// corner is (0, 0).
///
/// # Errors
///
/// Returns an error if the graph and slice set disagree in size, or if any
/// slice cannot be reached from the origin
pub fn place_slices(
    graph: &OverlapGraph,
    slices: &SliceSet,
    group_name: &str,
    config: &AssemblyConfig,
) -> Result<Assembly> {
    let count = slices.len();
    if graph.slice_count() != count {
        return Err(invalid_parameter(
            "graph",
            &graph.slice_count(),
            &format!("graph spans a different number of slices than the set ({count})"),
        ));
    }

    let origin = graph.most_connected().ok_or_else(|| {
        invalid_parameter("slices", &count, &"at least one slice is required")
    })?;
    debug!(origin = slices.name(origin), "Placing slices");

    let mut positions: Vec<Option<Offset>> = vec![None; count];
    let mut examined = VisitedSet::new(graph.edge_count());
    let mut queue = VecDeque::new();
    let mut warnings = Vec::new();

    if let Some(slot) = positions.get_mut(origin) {
        *slot = Some(Offset::ZERO);
        queue.push_back(origin);
    }

    while let Some(id) = queue.pop_front() {
        let Some(base) = positions.get(id).copied().flatten() else {
            continue;
        };

        for neighbor in graph.neighbors(id) {
            if !examined.insert(neighbor.edge) {
                continue;
            }

            let computed = base + neighbor.offset;
            let Some(slot) = positions.get_mut(neighbor.slice) else {
                continue;
            };

            if let Some(placed) = *slot {
                let disagreement = placed.chebyshev_distance(computed);
                if disagreement > u64::from(config.offset_tolerance) {
                    warnings.push(InconsistentOverlap {
                        slice: slices.name(neighbor.slice).to_string(),
                        neighbor: slices.name(id).to_string(),
                        placed,
                        computed,
                        disagreement,
                    });
                }
            } else {
                *slot = Some(computed);
                queue.push_back(neighbor.slice);
            }
        }
    }

    let mut located = Vec::with_capacity(count);
    let mut unplaced = Vec::new();
    for (id, slice) in slices.iter() {
        match positions.get(id).copied().flatten() {
            Some(offset) => located.push((slice, offset)),
            None => unplaced.push(slice.name().to_string()),
        }
    }
    if !unplaced.is_empty() {
        return Err(CompositeError::InsufficientOverlap {
            slices: count,
            matches: graph.edge_count(),
            unplaced,
        });
    }

    let bounds = Rect::bounding_box(located.iter().map(|(slice, offset)| slice.rect_at(*offset)))
        .ok_or_else(|| invalid_parameter("slices", &count, &"nothing was placed"))?;

    let placements = located
        .iter()
        .map(|(slice, offset)| {
            let shifted = *offset - bounds.origin;
            Placement {
                filename: slice.name().to_string(),
                x: shifted.x as u32,
                y: shifted.y as u32,
                width: slice.width(),
                height: slice.height(),
            }
        })
        .collect();

    let layout = LayoutRecord::new(group_name, (bounds.width, bounds.height), placements)?;
    info!(
        slices = count,
        width = bounds.width,
        height = bounds.height,
        conflicts = warnings.len(),
        "Placed slices on canvas"
    );

    Ok(Assembly { layout, warnings })
}

/// Copy every slice into its placement on a fresh transparent canvas
///
/// Slices are drawn in file name order and copied rather than blended, so in
/// overlap regions the later file name wins.
///
/// # Errors
///
/// Returns an error if the layout is invalid, names a slice missing from
/// `slices`, or records a size that differs from the loaded slice
pub fn render(layout: &LayoutRecord, slices: &SliceSet) -> Result<RgbaImage> {
    layout.validate()?;

    let mut order: Vec<&Placement> = layout.placements.iter().collect();
    order.sort_by(|a, b| a.filename.cmp(&b.filename));

    let mut canvas = RgbaImage::new(layout.canvas.0, layout.canvas.1);
    for placement in order {
        let slice = slices
            .id_of(&placement.filename)
            .and_then(|id| slices.get(id))
            .ok_or_else(|| {
                invalid_layout(&format!(
                    "'{}' has no loaded slice to render",
                    placement.filename
                ))
            })?;

        let actual = (slice.width(), slice.height());
        if actual != placement.size() {
            return Err(CompositeError::SliceSizeMismatch {
                name: placement.filename.clone(),
                expected: placement.size(),
                actual,
            });
        }

        image::imageops::replace(
            &mut canvas,
            slice.pixels(),
            i64::from(placement.x),
            i64::from(placement.y),
        );
    }

    Ok(canvas)
}
