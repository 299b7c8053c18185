//! # Lattice
//!
//! A layered cell-grid compositor with minimal-diff terminal output.
//!
//! Lattice keeps a stack of named, z-ordered cell grids, merges them into
//! one frame, and emits only the ANSI needed to turn the previous frame into
//! the new one. Frames can be captured and blended for cross-fades.
//!
//! ## Core Concepts
//!
//! - **Grid buffers**: Fixed-size cell grids with clip, offset and a
//!   pluggable glyph-width oracle
//! - **Layer stack**: Replace-or-skip compositing in ascending z, with an
//!   optional override compositor
//! - **Diff renderer**: Runs of changed cells, redundant cursor moves and
//!   style-sets elided, one write per frame
//! - **Snapshots**: Frozen frames interpolated per channel
//!
//! ## Example
//!
//! ```rust
//! use lattice::{Presenter, RenderConfig, Rgb, Style};
//!
//! let mut presenter = Presenter::new(20, 4, &RenderConfig::default(), Vec::new());
//! let layer = presenter.stack_mut().add_layer("status", 0);
//! layer
//!     .buffer_mut()
//!     .write_text(0, 0, "ready", Style::DEFAULT.with_fg(Rgb::new(0, 255, 0)));
//!
//! let stats = presenter.present().unwrap();
//! assert!(stats.full_redraw);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod config;
pub mod layer;
pub mod layout;
pub mod presenter;
pub mod snapshot;
pub mod terminal;

// Re-exports for convenience
pub use buffer::{Cell, DiffRenderer, FrameStats, Glyph, GridBuffer, Modifiers, Rgb, Style, WidthFn};
pub use config::{ConfigError, RenderConfig};
pub use layer::{Compositor, Layer, LayerStack};
pub use layout::Rect;
pub use presenter::{Presenter, SurfaceEvent};
pub use snapshot::{BufferSnapshot, Crossfade};
pub use terminal::{ColorDepth, TerminalSession, VirtualScreen};
