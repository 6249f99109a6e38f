//! Staged output files that replace their destinations only on commit
//!
//! Each output is written to a hidden temporary file beside its destination.
//! Nothing at a destination path changes until [`StagedOutputs::commit`], so a
//! run that fails while encoding leaves the output folder exactly as it found
//! it. Uncommitted temporary files are deleted when dropped.

use crate::io::error::{CompositeError, Result, WithPath};
use crate::io::image::{encode_image, output_format};
use image::RgbaImage;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Outputs written to temporary siblings, waiting to be moved into place
#[derive(Default)]
pub struct StagedOutputs {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutputs {
    /// Number of staged outputs
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Test whether nothing has been staged
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Encode `pixels` for `path`, choosing the format from its extension
    ///
    /// # Errors
    ///
    /// Returns an error if the extension has no writable format, the parent
    /// folder cannot be created, or encoding fails
    pub fn stage_image(&mut self, pixels: &RgbaImage, path: &Path) -> Result<()> {
        let format = output_format(path)?;
        let mut file = temporary_sibling(path)?;

        let mut writer = BufWriter::new(file.as_file_mut());
        encode_image(pixels, &mut writer, format, path)?;
        writer.flush().with_path(path, "write staged image")?;
        drop(writer);

        self.staged.push((file, path.to_path_buf()));
        Ok(())
    }

    /// Stage raw bytes for `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the parent folder cannot be created or the bytes
    /// cannot be written
    pub fn stage_bytes(&mut self, bytes: &[u8], path: &Path) -> Result<()> {
        let mut file = temporary_sibling(path)?;
        file.write_all(bytes).with_path(path, "write staged file")?;
        file.flush().with_path(path, "write staged file")?;

        self.staged.push((file, path.to_path_buf()));
        Ok(())
    }

    /// Move every staged output over its destination, in staging order
    ///
    /// # Errors
    ///
    /// Returns an error if a rename fails; outputs not yet moved are discarded
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (file, path) in self.staged {
            file.persist(&path).map_err(|error| CompositeError::FileSystem {
                path: path.clone(),
                operation: "move output into place",
                source: error.error,
            })?;
            debug!(path = %path.display(), "Committed output");
            written.push(path);
        }
        Ok(written)
    }
}

// Dot-prefixed with an extension no decoder claims, so it is never listed as a slice
fn temporary_sibling(path: &Path) -> Result<NamedTempFile> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).with_path(parent, "create directory")?;

    let name = path
        .file_name()
        .map_or_else(|| "output".to_string(), |n| n.to_string_lossy().into_owned());
    Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".partial")
        .tempfile_in(parent)
        .with_path(parent, "create staged file")
}
