//! Buffer module: The grid data model and the diffing engine.
//!
//! This module contains:
//! - [`Cell`]: A glyph plus its [`Style`]
//! - [`GridBuffer`]: A clipped, offset grid of cells
//! - [`Rgb`]: True-color representation
//! - [`Modifiers`]: Text style bitflags
//! - [`diff`]: Diffing engine for generating minimal ANSI sequences

mod cell;
mod grid;
mod width;
pub mod diff;

pub use cell::{Cell, Glyph, Modifiers, Rgb, Style};
pub use diff::{DiffRenderer, FrameStats};
pub use grid::GridBuffer;
pub use width::{unicode_display_width, WidthFn};
