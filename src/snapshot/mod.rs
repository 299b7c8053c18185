//! Snapshot module: Frozen copies of a grid, blending and cross-fades.

mod blend;
mod transition;

pub use blend::BufferSnapshot;
pub use transition::Crossfade;
