//! Cutting an edited composite back into its slices

use crate::io::error::{CompositeError, Result};
use crate::io::layout::LayoutRecord;
use crate::spatial::SliceImage;
use image::RgbaImage;
use image::imageops::crop_imm;
use std::path::Path;

/// Check that `composite` has exactly the canvas size the layout declares
///
/// # Errors
///
/// Returns [`CompositeError::CanvasSizeMismatch`] naming `path` if the sizes differ
pub fn check_canvas(layout: &LayoutRecord, composite: &RgbaImage, path: &Path) -> Result<()> {
    let actual = composite.dimensions();
    if actual == layout.canvas {
        Ok(())
    } else {
        Err(CompositeError::CanvasSizeMismatch {
            path: path.to_path_buf(),
            expected: layout.canvas,
            actual,
        })
    }
}

/// Crop every placement out of `composite`, in layout order
///
/// Each returned slice carries its placement's file name. For an unedited
/// composite of a consistent slice set the crops equal the original slices.
///
/// # Errors
///
/// Returns an error if the layout is invalid or the composite's size differs
/// from the layout's canvas
pub fn disassemble(
    layout: &LayoutRecord,
    composite: &RgbaImage,
    path: &Path,
) -> Result<Vec<SliceImage>> {
    layout.validate()?;
    check_canvas(layout, composite, path)?;

    Ok(layout
        .placements
        .iter()
        .map(|placement| {
            let pixels = crop_imm(
                composite,
                placement.x,
                placement.y,
                placement.width,
                placement.height,
            )
            .to_image();
            SliceImage::new(placement.filename.clone(), pixels)
        })
        .collect())
}
