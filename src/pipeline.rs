//! One-shot runs that read inputs, compute, and persist outputs
//!
//! Each run either writes all of its outputs or none of them. Everything is
//! computed in memory and staged beside its destination first; files already
//! in the output folder are only replaced once every output has been staged.

use crate::algorithm::assembly::{
    AssemblyConfig, InconsistentOverlap, place_slices, render as render_composite,
};
use crate::algorithm::disassembly::disassemble as crop_slices;
use crate::algorithm::locator::{Locator, LocatorConfig};
use crate::io::configuration::DEFAULT_GROUP_NAME;
use crate::io::error::Result;
use crate::io::image::{load_image, load_named_slices, load_slice_folder, output_format};
use crate::io::layout::{LayoutRecord, layout_path_for};
use crate::io::progress::ProgressManager;
use crate::io::staging::StagedOutputs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for an assemble run
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Overlap search thresholds
    pub locator: LocatorConfig,
    /// Placement tolerances
    pub assembly: AssemblyConfig,
    /// Group name stored in the layout; defaults to the composite's file stem
    pub group_name: Option<String>,
    /// Layout record path; defaults to the composite path with a `.json` extension
    pub layout_path: Option<PathBuf>,
}

/// Outputs of an assemble run
#[derive(Debug, Clone)]
pub struct AssembleReport {
    /// Where the composite was written
    pub composite_path: PathBuf,
    /// Where the layout record was written
    pub layout_path: PathBuf,
    /// The written layout record
    pub layout: LayoutRecord,
    /// Conflicting placements found while assembling
    pub warnings: Vec<InconsistentOverlap>,
}

/// Outputs of a disassemble run
#[derive(Debug, Clone)]
pub struct DisassembleReport {
    /// Every slice file written, in layout order
    pub written: Vec<PathBuf>,
}

/// Runs assemble, render and disassemble with optional progress display
#[derive(Default)]
pub struct Pipeline {
    progress: ProgressManager,
}

impl Pipeline {
    /// Create a pipeline; `show_progress` enables the pair search bar
    pub const fn new(show_progress: bool) -> Self {
        Self {
            progress: ProgressManager::new(show_progress),
        }
    }

    /// Locate, place and render every slice in `slice_folder`
    ///
    /// Writes the composite to `composite_path` and its layout record beside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder holds no slices, the slices do not all
    /// connect, or any read or write fails. No output remains on error.
    pub fn assemble(
        &mut self,
        slice_folder: &Path,
        composite_path: &Path,
        options: &AssembleOptions,
    ) -> Result<AssembleReport> {
        let layout_path = options
            .layout_path
            .clone()
            .unwrap_or_else(|| layout_path_for(composite_path));
        let group_name = options.group_name.clone().unwrap_or_else(|| {
            composite_path
                .file_stem()
                .map_or_else(|| DEFAULT_GROUP_NAME.to_string(), |s| s.to_string_lossy().into_owned())
        });

        let slices = load_slice_folder(
            slice_folder,
            &[composite_path.to_path_buf(), layout_path.clone()],
        )?;
        info!(folder = %slice_folder.display(), slices = slices.len(), "Loaded slices");

        let locator = Locator::new(&slices, options.locator)?;
        self.progress.start_search("Matching", locator.pair_count());
        let progress = &self.progress;
        let located = locator.locate_with(|first, second| {
            progress.advance(slices.name(first), slices.name(second));
        });
        self.progress.finish();
        let graph = located?;

        let assembly = place_slices(&graph, &slices, &group_name, &options.assembly)?;
        let composite = render_composite(&assembly.layout, &slices)?;

        let mut outputs = StagedOutputs::default();
        outputs.stage_image(&composite, composite_path)?;
        assembly.layout.stage(&mut outputs, &layout_path)?;
        outputs.commit()?;

        info!(
            composite = %composite_path.display(),
            layout = %layout_path.display(),
            "Wrote composite"
        );

        Ok(AssembleReport {
            composite_path: composite_path.to_path_buf(),
            layout_path,
            layout: assembly.layout,
            warnings: assembly.warnings,
        })
    }

    /// Re-render a composite from a saved layout without searching overlaps
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid, a slice is missing or has
    /// changed size, or any read or write fails
    pub fn render(
        &self,
        layout_path: &Path,
        slice_folder: &Path,
        composite_path: &Path,
    ) -> Result<LayoutRecord> {
        let layout = LayoutRecord::load(layout_path)?;
        let slices = load_named_slices(
            slice_folder,
            layout.placements.iter().map(|p| p.filename.as_str()),
        )?;
        let composite = render_composite(&layout, &slices)?;

        let mut outputs = StagedOutputs::default();
        outputs.stage_image(&composite, composite_path)?;
        outputs.commit()?;

        info!(
            composite = %composite_path.display(),
            slices = slices.len(),
            "Rendered composite from layout"
        );
        Ok(layout)
    }

    /// Cut an edited composite back into its slices
    ///
    /// Slices are written into `output_folder` under their original file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid, the composite's size differs
    /// from the layout's canvas, or any read or write fails. No slice remains
    /// on error.
    pub fn disassemble(
        &self,
        composite_path: &Path,
        layout_path: &Path,
        output_folder: &Path,
    ) -> Result<DisassembleReport> {
        let layout = LayoutRecord::load(layout_path)?;
        let composite = load_image(composite_path)?;
        let slices = crop_slices(&layout, &composite, composite_path)?;

        // Every name must be encodable before anything is staged
        let paths = slices
            .iter()
            .map(|slice| {
                let path = output_folder.join(slice.name());
                output_format(&path).map(|_| path)
            })
            .collect::<Result<Vec<PathBuf>>>()?;

        let mut outputs = StagedOutputs::default();
        for (slice, path) in slices.iter().zip(&paths) {
            outputs.stage_image(slice.pixels(), path)?;
        }
        let written = outputs.commit()?;

        info!(
            folder = %output_folder.display(),
            slices = written.len(),
            "Wrote disassembled slices"
        );
        Ok(DisassembleReport { written })
    }
}
