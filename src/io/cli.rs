//! Command-line interface for assembling and disassembling slice composites

use crate::algorithm::assembly::AssemblyConfig;
use crate::algorithm::locator::LocatorConfig;
use crate::io::configuration::{
    DEFAULT_MAX_OVERLAP, DEFAULT_MIN_OVERLAP_PIXELS, DEFAULT_MIN_SIMILARITY,
    DEFAULT_OFFSET_TOLERANCE, EXIT_INCONSISTENT_OVERLAP,
};
use crate::io::error::Result;
use crate::pipeline::{AssembleOptions, Pipeline};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slicecomp")]
#[command(
    author,
    version,
    about = "Assemble overlapping slices into one composite and cut edited composites back into slices"
)]
/// Command-line arguments for the slice compositor
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log detail (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Operations exposed on the command line
#[derive(Subcommand)]
pub enum Command {
    /// Locate overlaps in a slice folder and write a composite plus layout record
    Assemble(AssembleArgs),

    /// Cut an edited composite back into slices using its layout record
    Disassemble {
        /// Edited composite image
        #[arg(value_name = "COMPOSITE")]
        composite: PathBuf,
        /// Layout record written when the composite was assembled
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,
        /// Folder to write the slices into
        #[arg(value_name = "OUTPUT_FOLDER")]
        output: PathBuf,
    },

    /// Re-render a composite from a saved layout record without re-locating
    Render {
        /// Layout record to render
        #[arg(value_name = "LAYOUT")]
        layout: PathBuf,
        /// Folder holding the slices the layout names
        #[arg(value_name = "SLICE_FOLDER")]
        slices: PathBuf,
        /// Composite image to write
        #[arg(value_name = "COMPOSITE")]
        composite: PathBuf,
    },
}

/// Arguments for the assemble operation
#[derive(Args)]
pub struct AssembleArgs {
    /// Folder of slice images
    #[arg(value_name = "SLICE_FOLDER")]
    pub slices: PathBuf,

    /// Composite image to write; the layout record goes beside it
    #[arg(value_name = "COMPOSITE")]
    pub composite: PathBuf,

    /// Write the layout record here instead of beside the composite
    #[arg(short, long)]
    pub layout: Option<PathBuf>,

    /// Group name stored in the layout record
    #[arg(short, long)]
    pub group: Option<String>,

    /// Minimum similarity (0-1) for two slices to count as adjacent
    #[arg(short = 's', long, default_value_t = DEFAULT_MIN_SIMILARITY)]
    pub min_similarity: f64,

    /// Widest border strip, in pixels, searched between two slices
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_OVERLAP)]
    pub max_overlap: u32,

    /// Fewest counted pixels an overlap must contain
    #[arg(short = 'p', long, default_value_t = DEFAULT_MIN_OVERLAP_PIXELS)]
    pub min_overlap_pixels: u32,

    /// Largest disagreement, in pixels, between placement paths before warning
    #[arg(short, long, default_value_t = DEFAULT_OFFSET_TOLERANCE)]
    pub tolerance: u32,
}

impl AssembleArgs {
    /// Bundle the thresholds into pipeline options
    pub fn options(&self) -> AssembleOptions {
        AssembleOptions {
            locator: LocatorConfig {
                min_similarity: self.min_similarity,
                max_overlap: self.max_overlap,
                min_overlap_pixels: self.min_overlap_pixels,
            },
            assembly: AssemblyConfig {
                offset_tolerance: self.tolerance,
            },
            group_name: self.group.clone(),
            layout_path: self.layout.clone(),
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log filter used when `RUST_LOG` is not set
    pub const fn default_log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags. Calling this twice is
/// harmless; the second call keeps the first subscriber.
pub fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(error) = installed {
        debug!(%error, "Keeping the log subscriber already installed");
    }
}

/// How a successful command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything was written with no warnings
    Completed,
    /// Outputs were written, but this many placements disagreed
    CompletedWithWarnings(usize),
}

impl Outcome {
    /// Process exit code for this outcome
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::CompletedWithWarnings(_) => EXIT_INCONSISTENT_OVERLAP,
        }
    }
}

/// Dispatches a parsed command line to the pipeline
pub struct CommandProcessor {
    cli: Cli,
    pipeline: Pipeline,
}

impl CommandProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let pipeline = Pipeline::new(cli.should_show_progress());
        Self { cli, pipeline }
    }

    /// Run the selected command
    ///
    /// Warnings collected during assembly are logged together once the run
    /// has written its outputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected operation fails
    pub fn process(&mut self) -> Result<Outcome> {
        match &self.cli.command {
            Command::Assemble(args) => {
                let report =
                    self.pipeline
                        .assemble(&args.slices, &args.composite, &args.options())?;

                info!(
                    slices = report.layout.placements.len(),
                    width = report.layout.canvas.0,
                    height = report.layout.canvas.1,
                    "Assembled composite"
                );

                if report.warnings.is_empty() {
                    return Ok(Outcome::Completed);
                }
                for warning in &report.warnings {
                    warn!("{warning}");
                }
                warn!(
                    count = report.warnings.len(),
                    layout = %report.layout_path.display(),
                    "Placements disagree; check the layout record"
                );
                Ok(Outcome::CompletedWithWarnings(report.warnings.len()))
            }
            Command::Disassemble {
                composite,
                layout,
                output,
            } => {
                self.pipeline.disassemble(composite, layout, output)?;
                Ok(Outcome::Completed)
            }
            Command::Render {
                layout,
                slices,
                composite,
            } => {
                self.pipeline.render(layout, slices, composite)?;
                Ok(Outcome::Completed)
            }
        }
    }
}
