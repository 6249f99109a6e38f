//! Slice compositor for bitmap art packs
//!
//! Locates how a folder of overlapping slice images fits together, renders them onto one
//! composite canvas with a JSON layout record, and cuts an edited composite back into the
//! original slice files using that record.

#![forbid(unsafe_code)]

/// Overlap search, placement propagation, rendering and cropping
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// End-to-end assemble, render and disassemble runs with persistence
pub mod pipeline;
/// Slice storage and rectangle geometry
pub mod spatial;

pub use io::error::{CompositeError, Result};
