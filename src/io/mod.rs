//! Filesystem, command-line and configuration plumbing

/// Command-line interface and command dispatch
pub mod cli;
/// Default thresholds and output conventions
pub mod configuration;
/// Error types and path context helpers
pub mod error;
/// Slice folder loading and image export
pub mod image;
/// Layout record persistence
pub mod layout;
/// Progress display for long searches
pub mod progress;
/// Outputs staged beside their destinations until a run commits
pub mod staging;
