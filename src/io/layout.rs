//! Layout record persistence
//!
//! The record is pretty-printed JSON so an artist can open it beside the
//! composite and correct a flagged placement by hand:
//!
//! ```json
//! {
//!   "group_name": "spells",
//!   "composite_size": [180, 180],
//!   "images": [
//!     { "filename": "a.bmp", "x": 0, "y": 0, "width": 100, "height": 100 }
//!   ]
//! }
//! ```

use crate::io::configuration::LAYOUT_EXTENSION;
use crate::io::error::{CompositeError, Result, WithPath, invalid_layout};
use crate::io::staging::StagedOutputs;
use crate::spatial::{Offset, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Position and size of one slice on the composite canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// File name of the slice, without directory components
    pub filename: String,
    /// Left edge on the canvas
    pub x: u32,
    /// Top edge on the canvas
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Placement {
    /// Canvas rectangle covered by this placement
    pub fn rect(&self) -> Rect {
        Rect::new(
            Offset::new(i64::from(self.x), i64::from(self.y)),
            self.width,
            self.height,
        )
    }

    /// Size as (width, height)
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Durable description of one composite: canvas size and every slice placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Label for the slice group, informational only
    pub group_name: String,
    /// Canvas size as (width, height)
    #[serde(rename = "composite_size")]
    pub canvas: (u32, u32),
    /// Placements ordered by file name
    #[serde(rename = "images")]
    pub placements: Vec<Placement>,
}

impl LayoutRecord {
    /// Build a record, ordering placements by file name
    ///
    /// # Errors
    ///
    /// Returns an error if the placements violate a layout invariant
    pub fn new(
        group_name: impl Into<String>,
        canvas: (u32, u32),
        mut placements: Vec<Placement>,
    ) -> Result<Self> {
        placements.sort_by(|a, b| a.filename.cmp(&b.filename));
        let record = Self {
            group_name: group_name.into(),
            canvas,
            placements,
        };
        record.validate()?;
        Ok(record)
    }

    /// Canvas rectangle anchored at the origin
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(Offset::ZERO, self.canvas.0, self.canvas.1)
    }

    /// Look up a placement by slice file name
    pub fn placement(&self, filename: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.filename == filename)
    }

    /// Check the record's invariants
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record has no placements
    /// - A file name is empty, contains a path separator, or repeats
    /// - A placement is empty or extends past the canvas
    pub fn validate(&self) -> Result<()> {
        if self.placements.is_empty() {
            return Err(invalid_layout(&"the record lists no images"));
        }

        let canvas = self.canvas_rect();
        let mut seen = HashSet::new();
        for placement in &self.placements {
            if !is_bare_file_name(&placement.filename) {
                return Err(invalid_layout(&format!(
                    "'{}' is not a plain file name",
                    placement.filename
                )));
            }
            if !seen.insert(placement.filename.as_str()) {
                return Err(invalid_layout(&format!(
                    "'{}' is listed more than once",
                    placement.filename
                )));
            }
            if placement.width == 0 || placement.height == 0 {
                return Err(invalid_layout(&format!(
                    "'{}' has an empty rectangle",
                    placement.filename
                )));
            }
            if !canvas.contains(&placement.rect()) {
                return Err(invalid_layout(&format!(
                    "'{}' at ({}, {}) size {}x{} extends past the {}x{} canvas",
                    placement.filename,
                    placement.x,
                    placement.y,
                    placement.width,
                    placement.height,
                    self.canvas.0,
                    self.canvas.1
                )));
            }
        }
        Ok(())
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self).map(|mut json| {
            json.push('\n');
            json
        })
    }

    /// Stage the record for `path` alongside a run's other outputs
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the staged file cannot be written
    pub fn stage(&self, outputs: &mut StagedOutputs, path: &Path) -> Result<()> {
        let json = self.to_json().map_err(|source| CompositeError::LayoutFormat {
            path: path.to_path_buf(),
            source,
        })?;
        outputs.stage_bytes(json.as_bytes(), path)
    }

    /// Write the record to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut outputs = StagedOutputs::default();
        self.stage(&mut outputs, path)?;
        outputs.commit().map(|_| ())
    }

    /// Read and validate a record from `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a layout record,
    /// or violates a layout invariant
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).with_path(path, "read layout record")?;
        let record: Self =
            serde_json::from_str(&json).map_err(|source| CompositeError::LayoutFormat {
                path: path.to_path_buf(),
                source,
            })?;
        record.validate()?;
        Ok(record)
    }
}

/// Default layout record path for a composite: same stem, `.json` extension
pub fn layout_path_for(composite: &Path) -> PathBuf {
    composite.with_extension(LAYOUT_EXTENSION)
}

fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}
