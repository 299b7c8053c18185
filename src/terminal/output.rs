//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use super::color::{ansi256_index, ansi8_index, ColorDepth};
use crate::buffer::{Modifiers, Rgb, Style};
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Move the cursor to a 0-indexed `(x, y)`.
    ///
    /// Uses the most compact absolute form:
    /// - `\x1b[H` for home
    /// - `\x1b[{row}H` for column 1
    /// - `\x1b[{row};{col}H` otherwise
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        let row = u32::from(y) + 1;
        let col = u32::from(x) + 1;
        if row == 1 && col == 1 {
            self.data.extend_from_slice(b"\x1b[H");
        } else if col == 1 {
            let _ = write!(self.data, "\x1b[{row}H");
        } else {
            let _ = write!(self.data, "\x1b[{row};{col}H");
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Emit one SGR sequence per active modifier.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::BOLD) {
            self.data.extend_from_slice(b"\x1b[1m");
        }
        if modifiers.contains(Modifiers::DIM) {
            self.data.extend_from_slice(b"\x1b[2m");
        }
        if modifiers.contains(Modifiers::ITALIC) {
            self.data.extend_from_slice(b"\x1b[3m");
        }
        if modifiers.contains(Modifiers::UNDERLINE) {
            self.data.extend_from_slice(b"\x1b[4m");
        }
    }

    /// Set foreground color at the given depth.
    #[inline]
    pub fn set_fg(&mut self, color: Rgb, depth: ColorDepth) {
        let _ = match depth {
            ColorDepth::TrueColor => {
                write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
            }
            ColorDepth::Ansi256 => write!(self.data, "\x1b[38;5;{}m", ansi256_index(color)),
            ColorDepth::Ansi8 => write!(self.data, "\x1b[{}m", 30 + ansi8_index(color)),
        };
    }

    /// Set background color at the given depth.
    #[inline]
    pub fn set_bg(&mut self, color: Rgb, depth: ColorDepth) {
        let _ = match depth {
            ColorDepth::TrueColor => {
                write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
            }
            ColorDepth::Ansi256 => write!(self.data, "\x1b[48;5;{}m", ansi256_index(color)),
            ColorDepth::Ansi8 => write!(self.data, "\x1b[{}m", 40 + ansi8_index(color)),
        };
    }

    /// Emit a complete style-set: reset, modifiers, foreground, background.
    ///
    /// The background is always emitted so the theme color is reasserted
    /// on every style change.
    pub fn set_style(&mut self, style: Style, depth: ColorDepth) {
        self.reset_attrs();
        self.set_modifiers(style.modifiers);
        self.set_fg(style.fg, depth);
        self.set_bg(style.bg, depth);
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputBuffer")
            .field("len", &self.data.len())
            .field("capacity", &self.data.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(f: impl FnOnce(&mut OutputBuffer)) -> String {
        let mut out = OutputBuffer::new();
        f(&mut out);
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_cursor_move_forms() {
        assert_eq!(emitted(|o| o.cursor_move(0, 0)), "\x1b[H");
        assert_eq!(emitted(|o| o.cursor_move(0, 5)), "\x1b[6H");
        assert_eq!(emitted(|o| o.cursor_move(10, 5)), "\x1b[6;11H");
        assert_eq!(emitted(|o| o.cursor_move(u16::MAX, 0)), "\x1b[1;65536H");
    }

    #[test]
    fn test_fg_depths() {
        let c = Rgb::new(255, 128, 64);
        assert_eq!(emitted(|o| o.set_fg(c, ColorDepth::TrueColor)), "\x1b[38;2;255;128;64m");
        assert_eq!(emitted(|o| o.set_fg(Rgb::new(255, 0, 0), ColorDepth::Ansi256)), "\x1b[38;5;196m");
        assert_eq!(emitted(|o| o.set_fg(Rgb::new(255, 0, 0), ColorDepth::Ansi8)), "\x1b[31m");
    }

    #[test]
    fn test_bg_depths() {
        let c = Rgb::new(0, 128, 255);
        assert_eq!(emitted(|o| o.set_bg(c, ColorDepth::TrueColor)), "\x1b[48;2;0;128;255m");
        assert_eq!(emitted(|o| o.set_bg(Rgb::BLACK, ColorDepth::Ansi256)), "\x1b[48;5;16m");
        assert_eq!(emitted(|o| o.set_bg(Rgb::new(0, 0, 255), ColorDepth::Ansi8)), "\x1b[44m");
    }

    #[test]
    fn test_style_set_order() {
        let style = Style::new(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).underline().bold();
        assert_eq!(
            emitted(|o| o.set_style(style, ColorDepth::TrueColor)),
            "\x1b[0m\x1b[1m\x1b[4m\x1b[38;2;1;2;3m\x1b[48;2;4;5;6m"
        );
    }

    #[test]
    fn test_style_set_default_background_is_emitted() {
        assert_eq!(
            emitted(|o| o.set_style(Style::DEFAULT, ColorDepth::Ansi8)),
            "\x1b[0m\x1b[37m\x1b[40m"
        );
    }

    #[test]
    fn test_flush_to_single_write() {
        let mut out = OutputBuffer::new();
        out.write_str("hello");
        out.clear_screen();
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello\x1b[2J");
    }
}
