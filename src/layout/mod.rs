//! Layout primitives shared by buffers and layers.

mod rect;

pub use rect::Rect;
