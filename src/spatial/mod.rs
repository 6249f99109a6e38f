//! Spatial data structures
//!
//! This module contains:
//! - Integer offsets and canvas rectangles
//! - The slice arena shared by every stage of a run

/// Offsets, rectangles and bounding boxes
pub mod rect;
/// Loaded slice images indexed by id
pub mod slices;

pub use rect::{Offset, Rect};
pub use slices::{SliceId, SliceImage, SliceSet};
