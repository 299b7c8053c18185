//! `BufferSnapshot`: Immutable captures of a grid and their interpolation.

use crate::buffer::{Cell, GridBuffer, Style};

/// A deep copy of a buffer's cells, detached from the live buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BufferSnapshot {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl BufferSnapshot {
    /// A blank snapshot (default-styled spaces) for manual construction.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    /// Copy every cell of `buffer`.
    pub fn capture(buffer: &GridBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            cells: buffer.cells().to_vec(),
        }
    }

    /// Snapshot width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Snapshot height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// The cell at `(x, y)`, if in range.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell while building a snapshot. Returns `false` if out of range.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Interpolate between `a` and `b` at `t` (clamped to `[0, 1]`).
    ///
    /// The result covers the overlap of both snapshots. Colors mix linearly
    /// per channel; glyph and modifiers switch wholesale from `a` to `b` at
    /// `t = 0.5`. The endpoints reproduce `a` and `b` exactly.
    pub fn blend(a: &Self, b: &Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let width = a.width.min(b.width);
        let height = a.height.min(b.height);
        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));

        for y in 0..height {
            for x in 0..width {
                let (Some(from), Some(to)) = (a.get(x, y), b.get(x, y)) else {
                    continue;
                };
                let source = if t < 0.5 { from } else { to };
                let style = Style {
                    fg: from.fg().lerp(to.fg(), t),
                    bg: from.bg().lerp(to.bg(), t),
                    modifiers: source.style().modifiers,
                };
                cells.push(source.clone().with_style(style));
            }
        }

        Self { width, height, cells }
    }

    /// Write every cell into `buffer` through [`GridBuffer::write_cell`],
    /// so the buffer's offset and clip apply.
    pub fn apply(&self, buffer: &mut GridBuffer) {
        for (i, cell) in self.cells.iter().enumerate() {
            let x = (i % usize::from(self.width)) as i32;
            let y = (i / usize::from(self.width)) as i32;
            buffer.write_cell(x, y, cell);
        }
    }
}

impl From<&GridBuffer> for BufferSnapshot {
    fn from(buffer: &GridBuffer) -> Self {
        Self::capture(buffer)
    }
}
