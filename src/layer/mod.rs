//! Layer module: Named, z-ordered grids and the compositor that merges them.

mod stack;

pub use stack::{blit_layer, composite_layers, Compositor, Layer, LayerStack};
