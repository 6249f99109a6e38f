//! Slice folder loading and image export

use crate::io::error::{CompositeError, Result, WithPath};
use crate::io::staging::StagedOutputs;
use crate::spatial::{SliceImage, SliceSet};
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Test whether a path has an image extension the decoder recognises
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok()
}

/// Decode an image file into RGBA pixels
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| CompositeError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })
}

/// Load one slice, named after its file name
///
/// # Errors
///
/// Returns an error if the path has no file name or the image cannot be decoded
pub fn load_slice(path: &Path) -> Result<SliceImage> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CompositeError::FileSystem {
            path: path.to_path_buf(),
            operation: "read slice name",
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;
    Ok(SliceImage::new(name, load_image(path)?))
}

/// Image files directly inside `folder`, sorted by path
///
/// Entries that resolve to any path in `exclude` are skipped, so a composite
/// written into its own slice folder is not picked up as a slice next run.
///
/// # Errors
///
/// Returns an error if the folder cannot be listed
pub fn list_slice_files(folder: &Path, exclude: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let excluded: Vec<PathBuf> = exclude
        .iter()
        .filter_map(|path| std::fs::canonicalize(path).ok())
        .collect();

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).with_path(folder, "list slice folder")? {
        let path = entry.with_path(folder, "list slice folder")?.path();
        if !path.is_file() || !is_supported_image(&path) {
            continue;
        }
        let skip = std::fs::canonicalize(&path).is_ok_and(|canonical| excluded.contains(&canonical));
        if skip {
            debug!(path = %path.display(), "Skipping output file in slice folder");
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Load every slice image in `folder`
///
/// # Errors
///
/// Returns an error if the folder cannot be listed, holds no images, or any
/// image fails to decode
pub fn load_slice_folder(folder: &Path, exclude: &[PathBuf]) -> Result<SliceSet> {
    let files = list_slice_files(folder, exclude)?;
    if files.is_empty() {
        return Err(CompositeError::NoSlices {
            folder: folder.to_path_buf(),
        });
    }

    let slices = files
        .iter()
        .map(|path| load_slice(path))
        .collect::<Result<Vec<_>>>()?;
    debug!(folder = %folder.display(), count = slices.len(), "Loaded slice folder");
    SliceSet::new(slices)
}

/// Load the named slices from `folder`
///
/// # Errors
///
/// Returns an error if any named file is missing or fails to decode
pub fn load_named_slices<'a, I>(folder: &Path, names: I) -> Result<SliceSet>
where
    I: IntoIterator<Item = &'a str>,
{
    let slices = names
        .into_iter()
        .map(|name| {
            let path = folder.join(name);
            if path.is_file() {
                load_slice(&path)
            } else {
                Err(CompositeError::MissingSlice {
                    name: name.to_string(),
                    folder: folder.to_path_buf(),
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    SliceSet::new(slices)
}

/// Writable image format for `path`, chosen by its extension
///
/// # Errors
///
/// Returns [`CompositeError::ImageExport`] if the extension is unknown or its
/// format cannot be encoded
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let export_error = |source| CompositeError::ImageExport {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(export_error)?;
    if format.writing_enabled() {
        Ok(format)
    } else {
        let hint = ImageFormatHint::Exact(format);
        Err(export_error(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(hint.clone(), UnsupportedErrorKind::Format(hint)),
        )))
    }
}

/// Encode RGBA pixels as `format` into `writer`
///
/// Fully opaque images are written as RGB so 24-bit bitmaps stay 24-bit; any
/// transparency keeps the alpha channel.
///
/// # Errors
///
/// Returns an error naming `path` if encoding fails
pub fn encode_image<W>(
    pixels: &RgbaImage,
    writer: &mut W,
    format: ImageFormat,
    path: &Path,
) -> Result<()>
where
    W: Write + Seek,
{
    let opaque = pixels.pixels().all(|p| p.0[3] == u8::MAX);
    let image = if opaque {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(pixels.clone()).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(pixels.clone())
    };

    image
        .write_to(writer, format)
        .map_err(|source| CompositeError::ImageExport {
            path: path.to_path_buf(),
            source,
        })
}

/// Save RGBA pixels, creating parent directories
///
/// The file at `path` is replaced only once the image has been fully encoded.
///
/// # Errors
///
/// Returns an error if the extension has no writable format, the parent
/// directory cannot be created, or the image cannot be encoded or written
pub fn save_image(pixels: &RgbaImage, path: &Path) -> Result<()> {
    let mut outputs = StagedOutputs::default();
    outputs.stage_image(pixels, path)?;
    outputs.commit().map(|_| ())
}
