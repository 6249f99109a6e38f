//! Error types and path context for compositing operations

use crate::io::configuration::{
    EXIT_CANVAS_SIZE_MISMATCH, EXIT_FAILURE, EXIT_INSUFFICIENT_OVERLAP, EXIT_INVALID_LAYOUT,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for all compositing operations
#[derive(Debug, Error)]
pub enum CompositeError {
    /// Failed to load a slice or composite image from the filesystem
    #[error("Failed to load image '{}': {source}", .path.display())]
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a composite or slice image to disk
    #[error("Failed to export image to '{}': {source}", .path.display())]
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", .path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The layout record file is not valid JSON of the expected shape
    #[error("Failed to parse layout record '{}': {source}", .path.display())]
    LayoutFormat {
        /// Path to the layout record
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// The layout record parsed but violates a placement invariant
    #[error("Invalid layout record: {reason}")]
    InvalidLayout {
        /// Description of the violated invariant
        reason: String,
    },

    /// The slice folder held no readable images
    #[error("No slice images found in '{}'", .folder.display())]
    NoSlices {
        /// Folder that was scanned
        folder: PathBuf,
    },

    /// The overlap graph does not connect every slice
    ///
    /// Occurs when fewer than `slices - 1` pairs matched, or when the matches
    /// split the slices into more than one group.
    #[error(
        "Insufficient overlap: {matches} matches for {slices} slices, unplaced: {}",
        .unplaced.join(", ")
    )]
    InsufficientOverlap {
        /// Number of slices in the run
        slices: usize,
        /// Number of pairs that matched
        matches: usize,
        /// Slices that could not be reached from the origin
        unplaced: Vec<String>,
    },

    /// The composite's dimensions differ from the layout record's canvas
    #[error(
        "Canvas size mismatch for '{}': layout declares {}x{}, image is {}x{}",
        .path.display(), .expected.0, .expected.1, .actual.0, .actual.1
    )]
    CanvasSizeMismatch {
        /// Path to the composite image
        path: PathBuf,
        /// Canvas size declared by the layout record (width, height)
        expected: (u32, u32),
        /// Actual image size (width, height)
        actual: (u32, u32),
    },

    /// A slice named by the layout record is absent from the slice folder
    #[error("Slice '{name}' listed in the layout is missing from '{}'", .folder.display())]
    MissingSlice {
        /// File name from the layout record
        name: String,
        /// Folder that was searched
        folder: PathBuf,
    },

    /// A slice's dimensions differ from its recorded placement
    #[error(
        "Slice '{name}' is {}x{} but the layout records {}x{}",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    SliceSizeMismatch {
        /// File name of the slice
        name: String,
        /// Size recorded in the layout (width, height)
        expected: (u32, u32),
        /// Size of the image on disk (width, height)
        actual: (u32, u32),
    },

    /// Configuration value validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },
}

impl CompositeError {
    /// Process exit code distinguishing the failure kinds an artist acts on
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InsufficientOverlap { .. } => EXIT_INSUFFICIENT_OVERLAP,
            Self::CanvasSizeMismatch { .. } => EXIT_CANVAS_SIZE_MISMATCH,
            Self::LayoutFormat { .. } | Self::InvalidLayout { .. } => EXIT_INVALID_LAYOUT,
            _ => EXIT_FAILURE,
        }
    }
}

/// Convenience type alias for compositing results
pub type Result<T> = std::result::Result<T, CompositeError>;

/// Attaches path and operation context to raw I/O results
pub trait WithPath<T> {
    /// Convert an I/O failure into [`CompositeError::FileSystem`]
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation attached
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| CompositeError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> CompositeError {
    CompositeError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid layout error
pub fn invalid_layout(reason: &impl ToString) -> CompositeError {
    CompositeError::InvalidLayout {
        reason: reason.to_string(),
    }
}
