//! `GridBuffer`: A fixed-size grid of styled cells.
//!
//! Cells are stored contiguously in row-major order. Every write goes
//! through the same pipeline:
//!
//! ```text
//! (x, y) ──▶ + offset ──▶ clip test ──▶ bounds test ──▶ cells[y * w + x]
//! ```
//!
//! A write that fails any stage is dropped without error.

use super::cell::{Cell, Glyph, Rgb, Style};
use super::width::{unicode_display_width, WidthFn};
use crate::layout::Rect;

static BLANK_CELL: Cell = Cell::BLANK;

/// A grid of cells with a clip rectangle and a coordinate offset.
#[derive(Clone)]
pub struct GridBuffer {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    /// Width in columns.
    width: u16,
    /// Height in rows.
    height: u16,
    /// Active clip; `None` means the whole buffer.
    clip: Option<Rect>,
    /// Added to every write coordinate.
    offset: (i32, i32),
    /// Display width oracle.
    measure: WidthFn,
}

impl GridBuffer {
    /// Create a buffer filled with default-styled spaces.
    ///
    /// Zero dimensions are raised to 1.
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, &Cell::BLANK)
    }

    /// Create a buffer filled with transparent (empty-glyph) cells.
    pub fn transparent(width: u16, height: u16) -> Self {
        Self::filled(width, height, &Cell::TRANSPARENT)
    }

    fn filled(width: u16, height: u16, cell: &Cell) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            cells: vec![cell.clone(); usize::from(width) * usize::from(height)],
            width,
            height,
            clip: None,
            offset: (0, 0),
            measure: unicode_display_width,
        }
    }

    /// Get the buffer width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells. Out-of-range rows are empty.
    #[inline]
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = usize::from(y) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }

    /// Convert storage coordinates to a linear index.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get a cell by storage coordinates (offset and clip are ignored).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Read a cell by storage coordinates.
    ///
    /// Never fails: anything out of range reads as a default-styled space.
    pub fn get_cell(&self, x: i32, y: i32) -> &Cell {
        match (u16::try_from(x), u16::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y).unwrap_or(&BLANK_CELL),
            _ => &BLANK_CELL,
        }
    }

    /// Overwrite a cell by storage coordinates, bypassing clip and offset.
    ///
    /// Used by compositors. Returns `false` if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// The effective clip rectangle, always inside the buffer.
    #[inline]
    pub fn clip(&self) -> Rect {
        self.clip
            .unwrap_or_else(|| Rect::from_size(self.width, self.height))
    }

    /// Restrict writes to `rect`, clamped to the buffer bounds.
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip = Some(rect.clamp_to(self.width, self.height));
    }

    /// Allow writes anywhere in the buffer again.
    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Current write offset.
    #[inline]
    pub const fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Shift every subsequent write by `(dx, dy)`.
    pub const fn set_offset(&mut self, dx: i32, dy: i32) {
        self.offset = (dx, dy);
    }

    /// Replace the display width oracle.
    pub fn set_width_fn(&mut self, measure: WidthFn) {
        self.measure = measure;
    }

    /// The display width oracle in use.
    #[inline]
    pub fn width_fn(&self) -> WidthFn {
        self.measure
    }

    /// Measure a glyph with this buffer's oracle.
    #[inline]
    pub fn measure(&self, glyph: &str) -> u8 {
        (self.measure)(glyph).clamp(1, 2)
    }

    /// Resolve a logical coordinate to a storage index: offset, then clip,
    /// then bounds.
    fn resolve(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x.saturating_add(self.offset.0)).ok()?;
        let y = u16::try_from(y.saturating_add(self.offset.1)).ok()?;
        if !self.clip().contains(x, y) {
            return None;
        }
        self.index_of(x, y)
    }

    /// Store a ready-made cell at a logical coordinate.
    ///
    /// A glyph containing control characters is stored as `?`.
    /// Returns whether the cell was stored.
    pub fn write_cell(&mut self, x: i32, y: i32, cell: &Cell) -> bool {
        let Some(idx) = self.resolve(x, y) else {
            return false;
        };
        if cell.glyph_value().has_control() {
            self.cells[idx] = Cell::with_width(Glyph::REPLACEMENT, 1, cell.style());
        } else {
            self.cells[idx].clone_from(cell);
        }
        true
    }

    /// Write a glyph at a logical coordinate, replacing the whole cell.
    ///
    /// A glyph containing control characters is written as `?`.
    /// Returns whether the cell was stored.
    pub fn write(&mut self, x: i32, y: i32, glyph: &str, style: Style) -> bool {
        let Some(idx) = self.resolve(x, y) else {
            return false;
        };
        let glyph = printable_str(glyph);
        let width = self.measure(glyph.as_str());
        self.cells[idx] = Cell::with_width(glyph, width, style);
        true
    }

    fn write_glyph(&mut self, x: i32, y: i32, glyph: Glyph, style: Style) -> i32 {
        let width = self.measure(glyph.as_str());
        if let Some(idx) = self.resolve(x, y) {
            self.cells[idx] = Cell::with_width(glyph, width, style);
        }
        if width == 2 {
            self.write_cell(x.saturating_add(1), y, &Cell::blank(style));
        }
        x.saturating_add(i32::from(width))
    }

    /// Write a string one codepoint per cell.
    ///
    /// Each glyph advances the cursor by its display width; a wide glyph also
    /// blanks the cell to its right. Control characters are written as `?`.
    /// A wide glyph in the last column is stored, but the renderer shows it
    /// as a space since the terminal cannot fit it.
    /// Returns the logical column after the last glyph.
    pub fn write_text(&mut self, x: i32, y: i32, text: &str, style: Style) -> i32 {
        let mut cursor = x;
        for c in text.chars() {
            cursor = self.write_glyph(cursor, y, printable(c), style);
        }
        cursor
    }

    /// Write raw bytes as UTF-8 text.
    ///
    /// Each malformed sequence is written as a single `?`.
    pub fn write_bytes(&mut self, x: i32, y: i32, bytes: &[u8], style: Style) -> i32 {
        let mut cursor = x;
        for chunk in bytes.utf8_chunks() {
            for c in chunk.valid().chars() {
                cursor = self.write_glyph(cursor, y, printable(c), style);
            }
            if !chunk.invalid().is_empty() {
                cursor = self.write_glyph(cursor, y, Glyph::REPLACEMENT, style);
            }
        }
        cursor
    }

    /// Write the same glyph over a rectangle, cell by cell.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u16, height: u16, glyph: &str, style: Style) {
        let glyph = printable_str(glyph);
        let cell = Cell::with_width(glyph.clone(), self.measure(glyph.as_str()), style);
        for row in 0..i32::from(height) {
            for col in 0..i32::from(width) {
                self.write_cell(x.saturating_add(col), y.saturating_add(row), &cell);
            }
        }
    }

    /// Fill every cell with a space in the default foreground over `bg`.
    ///
    /// Ignores clip and offset.
    pub fn clear(&mut self, bg: Rgb) {
        self.cells.fill(Cell::blank(Style::DEFAULT.with_bg(bg)));
    }

    /// Fill every cell with the empty glyph, marking it undrawn.
    pub fn clear_transparent(&mut self) {
        self.cells.fill(Cell::TRANSPARENT);
    }

    /// Reallocate to new dimensions and clear transparent.
    ///
    /// Content is discarded, not migrated. The clip is re-clamped and the
    /// offset kept.
    pub fn reallocate(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.cells.clear();
        self.cells.resize(
            usize::from(self.width) * usize::from(self.height),
            Cell::TRANSPARENT,
        );
        self.clip = self.clip.map(|c| c.clamp_to(self.width, self.height));
    }

    /// Make this buffer's cells and dimensions equal to `other`'s.
    ///
    /// Clip, offset and oracle are buffer-local and stay as they are.
    pub fn copy_from(&mut self, other: &Self) {
        if self.size() == other.size() {
            self.cells.clone_from_slice(&other.cells);
        } else {
            self.cells.clone_from(&other.cells);
            self.width = other.width;
            self.height = other.height;
            self.clip = self.clip.map(|c| c.clamp_to(self.width, self.height));
        }
    }

    /// Whether both buffers hold identical cells at identical dimensions.
    pub fn same_content(&self, other: &Self) -> bool {
        self.size() == other.size() && self.cells == other.cells
    }

    /// The glyphs of one row concatenated, with empty cells as spaces.
    ///
    /// Placeholders right of wide glyphs are skipped.
    pub fn row_text(&self, y: u16) -> String {
        let row = self.row(y);
        let mut text = String::with_capacity(row.len());
        let mut x = 0;
        while x < row.len() {
            let cell = &row[x];
            text.push_str(if cell.is_empty() { " " } else { cell.glyph() });
            x += if cell.width() == 2 && row.get(x + 1).is_some_and(|c| c.glyph() == " ") {
                2
            } else {
                1
            };
        }
        text
    }
}

/// Control characters would move the terminal cursor behind our back.
fn printable(c: char) -> Glyph {
    if c.is_control() {
        Glyph::REPLACEMENT
    } else {
        Glyph::from_char(c)
    }
}

fn printable_str(glyph: &str) -> Glyph {
    if glyph.chars().any(char::is_control) {
        Glyph::REPLACEMENT
    } else {
        Glyph::new(glyph)
    }
}

impl std::fmt::Debug for GridBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clip", &self.clip())
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Style {
        Style::new(Rgb::new(255, 0, 0), Rgb::BLACK)
    }

    #[test]
    fn test_buffer_new() {
        let buffer = GridBuffer::new(80, 24);
        assert_eq!(buffer.size(), (80, 24));
        assert_eq!(buffer.len(), 80 * 24);
        assert_eq!(buffer.get(0, 0), Some(&Cell::BLANK));
    }

    #[test]
    fn test_buffer_zero_size_is_raised() {
        let buffer = GridBuffer::new(0, 0);
        assert_eq!(buffer.size(), (1, 1));
    }

    #[test]
    fn test_write_and_read_back() {
        let mut buffer = GridBuffer::new(10, 5);
        assert!(buffer.write(3, 2, "X", red()));
        assert_eq!(buffer.get_cell(3, 2), &Cell::new("X", red()));
    }

    #[test]
    fn test_write_out_of_bounds_is_noop() {
        let mut buffer = GridBuffer::new(10, 5);
        assert!(!buffer.write(10, 0, "X", red()));
        assert!(!buffer.write(-1, 0, "X", red()));
        assert!(!buffer.write(0, 5, "X", red()));
        assert!(buffer.cells().iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn test_get_cell_out_of_range() {
        let buffer = GridBuffer::transparent(4, 4);
        assert_eq!(buffer.get_cell(-1, 0), &Cell::BLANK);
        assert_eq!(buffer.get_cell(4, 0), &Cell::BLANK);
        assert_eq!(buffer.get_cell(0, i32::MAX), &Cell::BLANK);
        assert_eq!(buffer.get_cell(0, 0), &Cell::TRANSPARENT);
    }

    #[test]
    fn test_offset_applies_before_clip() {
        let mut buffer = GridBuffer::new(10, 10);
        buffer.set_offset(2, 3);
        buffer.set_clip(Rect::new(2, 3, 1, 1));
        assert!(buffer.write(0, 0, "O", red()));
        assert_eq!(buffer.get_cell(2, 3).glyph(), "O");
        assert!(!buffer.write(1, 0, "P", red()));
        assert_eq!(buffer.get_cell(3, 3), &Cell::BLANK);
    }

    #[test]
    fn test_negative_offset() {
        let mut buffer = GridBuffer::new(5, 5);
        buffer.set_offset(-2, -2);
        assert!(!buffer.write(1, 1, "A", red()));
        assert!(buffer.write(2, 2, "B", red()));
        assert_eq!(buffer.get_cell(0, 0).glyph(), "B");
    }

    #[test]
    fn test_clip_is_clamped() {
        let mut buffer = GridBuffer::new(10, 5);
        buffer.set_clip(Rect::new(8, 4, 100, 100));
        assert_eq!(buffer.clip(), Rect::new(8, 4, 2, 1));
        buffer.clear_clip();
        assert_eq!(buffer.clip(), Rect::from_size(10, 5));
    }

    #[test]
    fn test_clip_blocks_writes() {
        let mut buffer = GridBuffer::new(10, 5);
        buffer.set_clip(Rect::new(2, 1, 3, 2));
        buffer.fill_rect(0, 0, 10, 5, "#", red());
        for y in 0..5 {
            for x in 0..10 {
                let inside = (2..5).contains(&x) && (1..3).contains(&y);
                let expected = if inside { "#" } else { " " };
                assert_eq!(buffer.get_cell(x, y).glyph(), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_write_text_ascii() {
        let mut buffer = GridBuffer::new(10, 1);
        let end = buffer.write_text(1, 0, "abc", red());
        assert_eq!(end, 4);
        assert_eq!(buffer.row_text(0), " abc      ");
    }

    #[test]
    fn test_write_text_wide_glyph() {
        let mut buffer = GridBuffer::new(10, 1);
        let end = buffer.write_text(3, 0, "日", red());
        assert_eq!(end, 5);
        assert_eq!(buffer.get_cell(3, 0).glyph(), "日");
        assert_eq!(buffer.get_cell(3, 0).width(), 2);
        assert_eq!(buffer.get_cell(4, 0), &Cell::blank(red()));
        assert_eq!(buffer.get_cell(4, 0).width(), 1);
    }

    #[test]
    fn test_write_text_wide_glyph_at_edge() {
        let mut buffer = GridBuffer::new(4, 1);
        let end = buffer.write_text(3, 0, "日", red());
        assert_eq!(end, 5);
        assert_eq!(buffer.get_cell(3, 0).glyph(), "日");
    }

    #[test]
    fn test_write_bytes_malformed() {
        let mut buffer = GridBuffer::new(10, 1);
        let end = buffer.write_bytes(0, 0, b"a\xffb\xe6\x97", red());
        assert_eq!(end, 4);
        assert_eq!(buffer.row_text(0), "a?b?      ");
    }

    #[test]
    fn test_write_bytes_multibyte() {
        let mut buffer = GridBuffer::new(10, 1);
        let end = buffer.write_bytes(0, 0, "é€😀".as_bytes(), red());
        assert_eq!(buffer.get_cell(0, 0).glyph(), "é");
        assert_eq!(buffer.get_cell(1, 0).glyph(), "€");
        assert_eq!(buffer.get_cell(2, 0).glyph(), "😀");
        assert_eq!(end, 4);
    }

    #[test]
    fn test_write_text_control_chars() {
        let mut buffer = GridBuffer::new(5, 1);
        buffer.write_text(0, 0, "a\nb", red());
        assert_eq!(buffer.row_text(0), "a?b  ");
    }

    #[test]
    fn test_write_control_glyph_is_replaced() {
        let mut buffer = GridBuffer::new(4, 1);
        assert!(buffer.write(0, 0, "\n", red()));
        buffer.fill_rect(1, 0, 1, 1, "\x1b", red());
        assert!(buffer.write_cell(2, 0, &Cell::new("\t", red())));
        assert_eq!(buffer.row_text(0), "??? ");
        assert_eq!(buffer.get_cell(0, 0).style(), red());
        assert_eq!(buffer.get_cell(2, 0).width(), 1);
    }

    #[test]
    fn test_custom_width_fn() {
        let mut buffer = GridBuffer::new(6, 1);
        buffer.set_width_fn(|_| 2);
        let end = buffer.write_text(0, 0, "ab", red());
        assert_eq!(end, 4);
        assert_eq!(buffer.get_cell(2, 0).glyph(), "b");
    }

    #[test]
    fn test_clear() {
        let mut buffer = GridBuffer::new(3, 3);
        buffer.write(1, 1, "X", red());
        let bg = Rgb::new(0, 0, 80);
        buffer.clear(bg);
        assert!(buffer.cells().iter().all(|c| c.glyph() == " " && c.bg() == bg && c.fg() == Rgb::DEFAULT_FG));
    }

    #[test]
    fn test_clear_ignores_clip() {
        let mut buffer = GridBuffer::new(3, 3);
        buffer.set_clip(Rect::new(0, 0, 1, 1));
        buffer.clear_transparent();
        assert!(buffer.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_reallocate_discards_content() {
        let mut buffer = GridBuffer::new(10, 10);
        buffer.write(1, 1, "X", red());
        buffer.set_clip(Rect::new(5, 5, 5, 5));
        buffer.reallocate(4, 20);
        assert_eq!(buffer.size(), (4, 20));
        assert!(buffer.cells().iter().all(Cell::is_empty));
        assert_eq!(buffer.clip(), Rect::new(4, 5, 0, 5));
    }

    #[test]
    fn test_copy_from_resizes() {
        let mut a = GridBuffer::new(2, 2);
        let mut b = GridBuffer::new(5, 1);
        b.write(4, 0, "Z", red());
        a.copy_from(&b);
        assert!(a.same_content(&b));
        assert_eq!(a.get_cell(4, 0).glyph(), "Z");
    }
}
