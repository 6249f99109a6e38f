/// Canvas placement by breadth-first offset propagation, and rendering
pub mod assembly;
/// Compact visited sets for graph walks
pub mod bitset;
/// Cropping an edited composite back into slices
pub mod disassembly;
/// Undirected overlap graph over slice ids
pub mod graph;
/// Pairwise overlap search
pub mod locator;
/// Pixel difference scoring over an overlap region
pub mod scoring;
