//! Slice images and the arena that assigns their ids

use crate::io::error::{Result, invalid_parameter};
use crate::spatial::{Offset, Rect};
use image::RgbaImage;

/// Index of a slice within its [`SliceSet`]
pub type SliceId = usize;

/// One rectangular fragment of a larger image
#[derive(Debug, Clone)]
pub struct SliceImage {
    name: String,
    pixels: RgbaImage,
}

impl SliceImage {
    /// Wrap decoded pixels under the file name they were loaded from
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    /// File name, without directory components
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded RGBA pixels
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Rectangle covered by this slice when its top-left corner sits at `origin`
    pub fn rect_at(&self, origin: Offset) -> Rect {
        Rect::new(origin, self.width(), self.height())
    }
}

/// Slices of one run, sorted by file name so ids are stable across runs
#[derive(Debug, Clone, Default)]
pub struct SliceSet {
    slices: Vec<SliceImage>,
}

impl SliceSet {
    /// Build a set from loaded slices
    ///
    /// # Errors
    ///
    /// Returns an error if two slices share a file name or a slice is empty
    pub fn new(mut slices: Vec<SliceImage>) -> Result<Self> {
        slices.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(pair) = slices.windows(2).find(|pair| match pair {
            [a, b] => a.name == b.name,
            _ => false,
        }) {
            let name = pair.first().map(SliceImage::name).unwrap_or_default();
            return Err(invalid_parameter(
                "slice",
                &name,
                &"slice file names must be unique",
            ));
        }

        if let Some(empty) = slices.iter().find(|s| s.width() == 0 || s.height() == 0) {
            return Err(invalid_parameter(
                "slice",
                &empty.name,
                &"slice has no pixels",
            ));
        }

        Ok(Self { slices })
    }

    /// Number of slices
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Test if the set holds no slices
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slice by id
    pub fn get(&self, id: SliceId) -> Option<&SliceImage> {
        self.slices.get(id)
    }

    /// File name of a slice, or an empty string for an unknown id
    pub fn name(&self, id: SliceId) -> &str {
        self.slices.get(id).map_or("", SliceImage::name)
    }

    /// Look up a slice id by file name
    pub fn id_of(&self, name: &str) -> Option<SliceId> {
        self.slices
            .binary_search_by(|slice| slice.name.as_str().cmp(name))
            .ok()
    }

    /// Iterate slices in id order
    pub fn iter(&self) -> impl Iterator<Item = (SliceId, &SliceImage)> {
        self.slices.iter().enumerate()
    }
}
