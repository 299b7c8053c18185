//! Diffing Engine: Generate minimal ANSI sequences from frame changes.
//!
//! This module implements the core anti-flicker logic:
//! 1. Compare the current frame against the previous frame
//! 2. Walk each row in runs of consecutive changed cells
//! 3. Skip cursor moves when the terminal cursor is already in place
//! 4. Skip style-sets when the last emitted style still applies
//!
//! A run is defined by glyph-change contiguity alone. When the style
//! changes inside a run a style-set is interleaved and the run continues
//! without a cursor move.
//!
//! All output is accumulated in a single buffer and flushed with one syscall.

use super::{Cell, GridBuffer, Style};
use crate::config::RenderConfig;
use crate::terminal::{ColorDepth, OutputBuffer};
use std::io::{self, Write};
use tracing::{debug, trace};

/// Terminal state tracked while emitting one frame.
///
/// Both fields start unknown at the top of every frame, so the first run
/// always positions the cursor and sets a style.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// Where the terminal cursor is after the last emitted glyph.
    cursor: Option<(u32, u16)>,
    /// Last emitted style.
    style: Option<Style>,
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor: None,
            style: None,
        }
    }

    /// Forget the cursor position and style.
    pub const fn reset(&mut self) {
        self.cursor = None;
        self.style = None;
    }
}

/// Statistics about one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of cells emitted.
    pub cells_changed: usize,
    /// Number of runs of consecutive changed cells.
    pub runs: usize,
    /// Number of cursor-position instructions emitted.
    pub cursor_moves: usize,
    /// Number of style-set instructions emitted.
    pub style_changes: usize,
    /// Bytes in the frame's update stream.
    pub bytes: usize,
    /// Whether the frame cleared the screen and redrew everything.
    pub full_redraw: bool,
}

/// Diff renderer holding the output buffer and color depth.
///
/// The previous frame is owned by the caller and passed to [`render`]
/// explicitly; the renderer updates it to match the current frame.
///
/// [`render`]: DiffRenderer::render
pub struct DiffRenderer {
    depth: ColorDepth,
    output: OutputBuffer,
    state: DiffState,
    invalidated: bool,
    stats: FrameStats,
}

impl DiffRenderer {
    /// Create a renderer emitting colors at `depth`.
    pub fn new(depth: ColorDepth) -> Self {
        Self {
            depth,
            output: OutputBuffer::with_capacity(65536),
            state: DiffState::new(),
            invalidated: false,
            stats: FrameStats::default(),
        }
    }

    /// Create a renderer from a [`RenderConfig`].
    pub fn with_config(config: &RenderConfig) -> Self {
        Self {
            depth: config.color_depth,
            output: OutputBuffer::with_capacity(config.output_capacity),
            state: DiffState::new(),
            invalidated: false,
            stats: FrameStats::default(),
        }
    }

    /// The color depth used for style-sets.
    #[inline]
    pub const fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    /// Change the color depth. The next frame is redrawn in full so colors
    /// already on screen are re-encoded.
    pub fn set_color_depth(&mut self, depth: ColorDepth) {
        if self.depth != depth {
            self.depth = depth;
            self.invalidate();
        }
    }

    /// Force the next frame to clear the screen and redraw every cell.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Whether the next frame is a forced full redraw.
    #[inline]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Statistics of the last rendered frame.
    #[inline]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The update stream of the last rendered frame.
    #[inline]
    pub fn output(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Diff `current` against `previous` and build the update stream.
    ///
    /// Afterwards `previous` equals `current` (cells and dimensions). If the
    /// dimensions differ, or the renderer was invalidated, the stream starts
    /// with a screen clear and every cell is emitted.
    ///
    /// Identical buffers of equal size produce an empty stream.
    pub fn render(&mut self, current: &GridBuffer, previous: &mut GridBuffer) -> &[u8] {
        self.output.clear();
        self.state.reset();
        let mut stats = FrameStats::default();

        let full = self.invalidated || current.size() != previous.size();
        if full {
            debug!(
                from = ?previous.size(),
                to = ?current.size(),
                invalidated = self.invalidated,
                "full redraw"
            );
            self.output.clear_screen();
            stats.full_redraw = true;
        }

        for y in 0..current.height() {
            let before = if full { None } else { Some(previous.row(y)) };
            self.diff_row(y, current.row(y), before, &mut stats);
        }

        previous.copy_from(current);
        self.invalidated = false;

        stats.bytes = self.output.len();
        self.stats = stats;
        if stats.cells_changed > 0 {
            trace!(?stats, "frame diffed");
        }
        self.output.as_bytes()
    }

    /// Emit one row. `before` is `None` when every cell counts as changed.
    fn diff_row(&mut self, y: u16, row: &[Cell], before: Option<&[Cell]>, stats: &mut FrameStats) {
        let mut x = 0;
        let mut in_run = false;

        while x < row.len() {
            let cell = &row[x];
            let covers_next = cell.width() == 2 && row.get(x + 1).is_some_and(|c| c.glyph() == " ");
            let changed = before.map_or(true, |prev| {
                prev[x] != *cell || (covers_next && prev[x + 1] != row[x + 1])
            });
            if !changed {
                in_run = false;
                x += 1;
                continue;
            }
            if !in_run {
                stats.runs += 1;
                in_run = true;
            }

            let col = x as u32;
            if self.state.cursor != Some((col, y)) {
                self.output.cursor_move(x as u16, y);
                stats.cursor_moves += 1;
            }
            if self.state.style != Some(cell.style()) {
                self.output.set_style(cell.style(), self.depth);
                self.state.style = Some(cell.style());
                stats.style_changes += 1;
            }

            let (text, advance) = emitted(cell, x + 1 == row.len());
            self.output.write_str(text);
            stats.cells_changed += 1;

            self.state.cursor = Some((col + advance, y));

            // The blank right of a wide glyph is covered by it on screen.
            x += if covers_next { 2 } else { 1 };
        }
    }

    /// Write the last frame's stream to `writer` in one call.
    ///
    /// Nothing is written for an empty frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        self.output.flush_to(writer)
    }

    /// Render and flush in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn render_to<W: Write>(
        &mut self,
        current: &GridBuffer,
        previous: &mut GridBuffer,
        writer: &mut W,
    ) -> io::Result<FrameStats> {
        self.render(current, previous);
        self.flush_to(writer)?;
        Ok(self.stats)
    }
}

/// The text sent for a cell and the columns it advances the cursor.
///
/// Control glyphs become `?` and a wide glyph in the last column becomes a
/// space, so the tracked cursor always matches the terminal's.
fn emitted(cell: &Cell, last_column: bool) -> (&str, u32) {
    if cell.is_empty() || (last_column && cell.width() == 2) {
        (" ", 1)
    } else if cell.glyph_value().has_control() {
        ("?", 1)
    } else {
        (cell.glyph(), u32::from(cell.width()))
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new(ColorDepth::TrueColor)
    }
}

impl std::fmt::Debug for DiffRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffRenderer")
            .field("depth", &self.depth)
            .field("invalidated", &self.invalidated)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Modifiers, Rgb};

    fn red() -> Style {
        Style::new(Rgb::new(255, 0, 0), Rgb::BLACK)
    }

    fn blue() -> Style {
        Style::new(Rgb::new(0, 0, 255), Rgb::BLACK)
    }

    fn render(current: &GridBuffer, previous: &mut GridBuffer) -> (String, FrameStats) {
        let mut renderer = DiffRenderer::new(ColorDepth::TrueColor);
        let out = String::from_utf8(renderer.render(current, previous).to_vec()).unwrap();
        (out, renderer.stats())
    }

    #[test]
    fn test_diff_identical_buffers() {
        let mut a = GridBuffer::new(10, 5);
        a.write_text(0, 0, "hello", red());
        let mut b = a.clone();
        let (out, stats) = render(&a, &mut b);
        assert!(out.is_empty());
        assert_eq!(stats.cells_changed, 0);
    }

    #[test]
    fn test_style_change_inside_run() {
        let mut current = GridBuffer::new(3, 1);
        current.write(0, 0, "A", red());
        current.write(1, 0, "B", red());
        current.write(2, 0, "C", blue());
        let mut previous = GridBuffer::new(3, 1);

        let (out, stats) = render(&current, &mut previous);
        assert_eq!(
            out,
            "\x1b[H\x1b[0m\x1b[38;2;255;0;0m\x1b[48;2;0;0;0mAB\x1b[0m\x1b[38;2;0;0;255m\x1b[48;2;0;0;0mC"
        );
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.style_changes, 2);
        assert_eq!(stats.runs, 1);
        assert!(previous.same_content(&current));
    }

    #[test]
    fn test_separate_runs_move_cursor() {
        let mut current = GridBuffer::new(10, 2);
        current.write(1, 0, "a", red());
        current.write(5, 0, "b", red());
        current.write(0, 1, "c", red());
        let mut previous = GridBuffer::new(10, 2);

        let (out, stats) = render(&current, &mut previous);
        assert_eq!(stats.runs, 3);
        assert_eq!(stats.cursor_moves, 3);
        assert_eq!(stats.style_changes, 1);
        assert!(out.starts_with("\x1b[1;2H"));
        assert!(out.contains("a\x1b[1;6Hb\x1b[2Hc"));
    }

    #[test]
    fn test_new_row_needs_cursor_move() {
        let mut current = GridBuffer::new(2, 2);
        current.fill_rect(0, 0, 2, 2, "x", red());
        let mut previous = GridBuffer::new(2, 2);
        let (_, stats) = render(&current, &mut previous);
        assert_eq!(stats.cursor_moves, 2);
        assert_eq!(stats.runs, 2);
    }

    #[test]
    fn test_wide_glyph_advances_two_columns() {
        let mut current = GridBuffer::new(6, 1);
        current.write_text(0, 0, "日x", red());
        let mut previous = GridBuffer::new(6, 1);
        let (out, stats) = render(&current, &mut previous);
        assert_eq!(stats.cursor_moves, 1);
        assert_eq!(stats.cells_changed, 2);
        assert!(out.ends_with("日x"));
    }

    #[test]
    fn test_overwritten_placeholder_moves_back() {
        let mut current = GridBuffer::new(4, 1);
        current.write(0, 0, "日", red());
        current.write(1, 0, "z", red());
        let mut previous = GridBuffer::new(4, 1);
        let (out, stats) = render(&current, &mut previous);
        assert_eq!(stats.cursor_moves, 2);
        assert!(out.ends_with("日\x1b[1;2Hz"));
    }

    #[test]
    fn test_restored_placeholder_reemits_wide_glyph() {
        let mut current = GridBuffer::new(4, 1);
        current.write_text(0, 0, "日", red());
        let mut previous = current.clone();
        previous.write(1, 0, "z", red());
        let (out, stats) = render(&current, &mut previous);
        assert_eq!(stats.cells_changed, 1);
        assert!(out.ends_with("日"));
    }

    #[test]
    fn test_control_glyph_set_directly_emits_replacement() {
        let mut current = GridBuffer::new(3, 1);
        current.set(0, 0, Cell::new("\x1b", red()));
        current.set(1, 0, Cell::new("a", red()));
        let mut previous = GridBuffer::new(3, 1);
        let (out, stats) = render(&current, &mut previous);
        assert!(out.ends_with("?a"));
        assert_eq!(stats.cursor_moves, 1);
    }

    #[test]
    fn test_wide_glyph_in_last_column_emits_space() {
        let mut current = GridBuffer::new(4, 2);
        current.write_text(3, 0, "日", red());
        current.write(0, 1, "n", red());
        let mut previous = GridBuffer::new(4, 2);
        let (out, stats) = render(&current, &mut previous);
        assert!(!out.contains('日'));
        assert!(out.contains("\x1b[1;4H\x1b[0m\x1b[38;2;255;0;0m\x1b[48;2;0;0;0m \x1b[2Hn"));
        assert_eq!(stats.cells_changed, 2);
    }

    #[test]
    fn test_empty_glyph_emits_space() {
        let current = GridBuffer::transparent(2, 1);
        let mut previous = GridBuffer::new(2, 1);
        previous.write(0, 0, "q", red());
        let (out, stats) = render(&current, &mut previous);
        assert_eq!(stats.cells_changed, 2);
        assert!(out.ends_with("  "));
    }

    #[test]
    fn test_size_change_forces_full_redraw() {
        let current = GridBuffer::new(4, 2);
        let mut previous = GridBuffer::new(3, 2);
        let (out, stats) = render(&current, &mut previous);
        assert!(stats.full_redraw);
        assert!(out.starts_with("\x1b[2J"));
        assert_eq!(stats.cells_changed, 8);
        assert_eq!(previous.size(), (4, 2));
    }

    #[test]
    fn test_invalidate_forces_full_redraw_once() {
        let current = GridBuffer::new(3, 3);
        let mut previous = current.clone();
        let mut renderer = DiffRenderer::default();
        renderer.invalidate();
        renderer.render(&current, &mut previous);
        assert!(renderer.stats().full_redraw);
        assert_eq!(renderer.stats().cells_changed, 9);
        assert!(!renderer.is_invalidated());

        assert!(renderer.render(&current, &mut previous).is_empty());
    }

    #[test]
    fn test_modifiers_in_style_set() {
        let mut current = GridBuffer::new(1, 1);
        current.write(0, 0, "m", Style::DEFAULT.with_modifiers(Modifiers::DIM | Modifiers::ITALIC));
        let mut previous = GridBuffer::new(1, 1);
        let (out, _) = render(&current, &mut previous);
        assert!(out.contains("\x1b[0m\x1b[2m\x1b[3m\x1b[38;2;255;255;255m\x1b[48;2;0;0;0mm"));
    }

    #[test]
    fn test_color_depth_change_invalidates() {
        let mut renderer = DiffRenderer::default();
        renderer.set_color_depth(ColorDepth::TrueColor);
        assert!(!renderer.is_invalidated());
        renderer.set_color_depth(ColorDepth::Ansi8);
        assert!(renderer.is_invalidated());
    }

    #[test]
    fn test_render_to_flushes_once() {
        let mut current = GridBuffer::new(2, 1);
        current.write(0, 0, "k", red());
        let mut previous = GridBuffer::new(2, 1);
        let mut renderer = DiffRenderer::default();
        let mut sink = Vec::new();
        let stats = renderer.render_to(&current, &mut previous, &mut sink).unwrap();
        assert_eq!(stats.bytes, sink.len());

        sink.clear();
        let stats = renderer.render_to(&current, &mut previous, &mut sink).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert!(sink.is_empty());
    }
}
