//! Terminal module: ANSI emission, color depths and output sinks.

mod color;
mod output;
mod screen;
mod session;

pub use color::{ansi256_index, ansi8_index, ColorDepth};
pub use output::OutputBuffer;
pub use screen::VirtualScreen;
pub use session::TerminalSession;
