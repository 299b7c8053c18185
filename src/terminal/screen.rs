//! Virtual Screen: An in-memory terminal that interprets renderer output.
//!
//! Wraps a `vt100` parser so emitted frames can be replayed and inspected
//! cell by cell, without a real TTY.

use crate::buffer::{Modifiers, Rgb};
use std::io;

/// An off-screen terminal fed by the diff renderer.
pub struct VirtualScreen {
    parser: vt100::Parser,
}

impl VirtualScreen {
    /// Create a screen of `width` columns by `height` rows.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: vt100::Parser::new(height.max(1), width.max(1), 0),
        }
    }

    /// Interpret raw output bytes.
    pub fn process(&mut self, bytes: &[u8]) {
        self.parser.process(bytes);
    }

    /// Resize the screen, keeping what fits.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.parser.set_size(height.max(1), width.max(1));
    }

    /// `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        let (rows, cols) = self.parser.screen().size();
        (cols, rows)
    }

    /// Whole-screen text, rows joined by newlines, trailing blanks trimmed.
    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    /// Glyph at `(x, y)`. Unwritten cells read as `" "`; the right half of
    /// a wide glyph reads as `""`.
    pub fn glyph(&self, x: u16, y: u16) -> Option<String> {
        let cell = self.parser.screen().cell(y, x)?;
        if cell.is_wide_continuation() {
            return Some(String::new());
        }
        let text = cell.contents();
        Some(if text.is_empty() { " ".to_string() } else { text })
    }

    /// One full row, wide glyphs counted once.
    pub fn row_text(&self, y: u16) -> String {
        let (width, _) = self.size();
        (0..width).filter_map(|x| self.glyph(x, y)).collect()
    }

    /// Foreground at `(x, y)`; `None` for the terminal default.
    pub fn fg(&self, x: u16, y: u16) -> Option<Rgb> {
        self.parser
            .screen()
            .cell(y, x)
            .and_then(|cell| color_to_rgb(cell.fgcolor()))
    }

    /// Background at `(x, y)`; `None` for the terminal default.
    pub fn bg(&self, x: u16, y: u16) -> Option<Rgb> {
        self.parser
            .screen()
            .cell(y, x)
            .and_then(|cell| color_to_rgb(cell.bgcolor()))
    }

    /// Bold, italic and underline state at `(x, y)`.
    pub fn modifiers(&self, x: u16, y: u16) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        if let Some(cell) = self.parser.screen().cell(y, x) {
            modifiers.set(Modifiers::BOLD, cell.bold());
            modifiers.set(Modifiers::ITALIC, cell.italic());
            modifiers.set(Modifiers::UNDERLINE, cell.underline());
        }
        modifiers
    }

    /// Cursor position as `(x, y)`.
    pub fn cursor(&self) -> (u16, u16) {
        let (row, col) = self.parser.screen().cursor_position();
        (col, row)
    }
}

impl io::Write for VirtualScreen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.parser.process(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for VirtualScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualScreen").field("size", &self.size()).finish()
    }
}

const fn color_to_rgb(color: vt100::Color) -> Option<Rgb> {
    match color {
        vt100::Color::Default => None,
        vt100::Color::Rgb(r, g, b) => Some(Rgb::new(r, g, b)),
        vt100::Color::Idx(i) => Some(indexed_rgb(i)),
    }
}

/// Approximate RGB of an xterm palette index.
const fn indexed_rgb(idx: u8) -> Rgb {
    match idx {
        0 => Rgb::new(0, 0, 0),
        1 => Rgb::new(128, 0, 0),
        2 => Rgb::new(0, 128, 0),
        3 => Rgb::new(128, 128, 0),
        4 => Rgb::new(0, 0, 128),
        5 => Rgb::new(128, 0, 128),
        6 => Rgb::new(0, 128, 128),
        7 => Rgb::new(192, 192, 192),
        8 => Rgb::new(128, 128, 128),
        9 => Rgb::new(255, 0, 0),
        10 => Rgb::new(0, 255, 0),
        11 => Rgb::new(255, 255, 0),
        12 => Rgb::new(0, 0, 255),
        13 => Rgb::new(255, 0, 255),
        14 => Rgb::new(0, 255, 255),
        15 => Rgb::new(255, 255, 255),
        16..=231 => {
            let i = idx - 16;
            Rgb::new(cube_level(i / 36), cube_level((i / 6) % 6), cube_level(i % 6))
        }
        232..=255 => {
            let v = (idx - 232) * 10 + 8;
            Rgb::new(v, v, v)
        }
    }
}

const fn cube_level(step: u8) -> u8 {
    if step == 0 {
        0
    } else {
        step * 40 + 55
    }
}
