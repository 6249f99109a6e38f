//! Matching thresholds, output conventions and exit codes

// Overlap search defaults; each one is overridable from the command line
/// Minimum similarity (1 - mean difference) for two slices to count as adjacent
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.98;

/// Widest border strip, in pixels, that two adjacent slices may share
pub const DEFAULT_MAX_OVERLAP: u32 = 32;

/// Fewest counted pixels an overlap must contain to be scored
pub const DEFAULT_MIN_OVERLAP_PIXELS: u32 = 16;

// Chebyshev distance, so a one pixel slip on either axis is tolerated
/// Largest disagreement between two placement paths before a warning is raised
pub const DEFAULT_OFFSET_TOLERANCE: u32 = 1;

/// Alpha value at or above which a pixel is treated as opaque
pub const ALPHA_OPAQUE_THRESHOLD: u8 = 128;

/// Difference units charged for one pixel (sum of three channel differences)
pub const MAX_PIXEL_DIFFERENCE: u64 = 3 * 255;

// Output settings
/// Extension of the layout record written beside a composite
pub const LAYOUT_EXTENSION: &str = "json";

/// Group name recorded when none is given
pub const DEFAULT_GROUP_NAME: &str = "composite";

// Progress bar display settings
/// Pair count above which the search shows a progress bar
pub const PROGRESS_MIN_PAIRS: usize = 2;

// Process exit codes; clap reserves 2 for usage errors
/// Generic or I/O failure
pub const EXIT_FAILURE: u8 = 1;
/// The slices could not all be connected by overlaps
pub const EXIT_INSUFFICIENT_OVERLAP: u8 = 3;
/// The composite does not match the layout record's canvas
pub const EXIT_CANVAS_SIZE_MISMATCH: u8 = 4;
/// Outputs were written but some placements disagreed
pub const EXIT_INCONSISTENT_OVERLAP: u8 = 5;
/// The layout record is malformed or violates its invariants
pub const EXIT_INVALID_LAYOUT: u8 = 6;
