//! Cell: The atomic unit of the grid.
//!
//! A cell pairs a [`Glyph`] (zero or more codepoints) with a [`Style`].
//! The empty glyph means "nothing drawn here" and is what compositing
//! uses to tell transparent cells apart from a visible space.
//!
//! # Glyph Storage
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Glyph                                                       │
//! ├───────────────────────────────┬──────────────────────────────┤
//! │  Inline { [u8; 4], len }      │  Spilled(Arc<str>)           │
//! │  any single codepoint         │  ZWJ sequences, combining    │
//! └───────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Every single codepoint fits inline, so `write_text` never allocates.

use bitflags::bitflags;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default foreground (white)
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Default background (black). Also the compositor's transparency key.
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Whether this is pure black.
    #[inline]
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }

    /// Linearly interpolate towards `other`.
    ///
    /// `t` is clamped to `[0, 1]`. Channels are rounded to the nearest
    /// integer, so `t = 0` yields `self` and `t = 1` yields `other` exactly.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let a = f32::from(a);
            let b = f32::from(b);
            (b - a).mul_add(t, a).round().clamp(0.0, 255.0) as u8
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// # Example
    /// ```
    /// use lattice::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Visual attributes of a cell.
///
/// Two styles are equal iff colors and every modifier match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Style {
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Bold/dim/italic/underline.
    pub modifiers: Modifiers,
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Style {
    /// White on black, no modifiers.
    pub const DEFAULT: Self = Self {
        fg: Rgb::DEFAULT_FG,
        bg: Rgb::DEFAULT_BG,
        modifiers: Modifiers::empty(),
    };

    /// Create a style from foreground and background colors.
    #[inline]
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add bold.
    #[inline]
    #[must_use]
    pub const fn bold(self) -> Self {
        self.with_modifiers(self.modifiers.union(Modifiers::BOLD))
    }

    /// Add dim.
    #[inline]
    #[must_use]
    pub const fn dim(self) -> Self {
        self.with_modifiers(self.modifiers.union(Modifiers::DIM))
    }

    /// Add italic.
    #[inline]
    #[must_use]
    pub const fn italic(self) -> Self {
        self.with_modifiers(self.modifiers.union(Modifiers::ITALIC))
    }

    /// Add underline.
    #[inline]
    #[must_use]
    pub const fn underline(self) -> Self {
        self.with_modifiers(self.modifiers.union(Modifiers::UNDERLINE))
    }
}

/// The character content of a cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Glyph(Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
enum Repr {
    Inline { bytes: [u8; 4], len: u8 },
    Spilled(Arc<str>),
}

impl Glyph {
    /// No visible content.
    pub const EMPTY: Self = Self(Repr::Inline {
        bytes: [0; 4],
        len: 0,
    });

    /// A single space.
    pub const SPACE: Self = Self(Repr::Inline {
        bytes: [b' ', 0, 0, 0],
        len: 1,
    });

    /// The substitute for undecodable input.
    pub const REPLACEMENT: Self = Self(Repr::Inline {
        bytes: [b'?', 0, 0, 0],
        len: 1,
    });

    /// Create a glyph from a single character. Never allocates.
    #[inline]
    pub fn from_char(c: char) -> Self {
        let mut bytes = [0u8; 4];
        let len = c.encode_utf8(&mut bytes).len() as u8;
        Self(Repr::Inline { bytes, len })
    }

    /// Create a glyph from a string; anything over 4 bytes spills to the heap.
    pub fn new(s: &str) -> Self {
        let src = s.as_bytes();
        if src.len() <= 4 {
            let mut bytes = [0u8; 4];
            bytes[..src.len()].copy_from_slice(src);
            Self(Repr::Inline {
                bytes,
                len: src.len() as u8,
            })
        } else {
            Self(Repr::Spilled(Arc::from(s)))
        }
    }

    /// The glyph text.
    #[inline]
    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Inline { bytes, len } => {
                std::str::from_utf8(&bytes[..*len as usize]).unwrap_or_default()
            }
            Repr::Spilled(s) => s,
        }
    }

    /// Whether this glyph has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Repr::Inline { len: 0, .. })
    }

    /// Whether any character would act on the terminal instead of printing.
    #[inline]
    pub fn has_control(&self) -> bool {
        self.as_str().chars().any(char::is_control)
    }

    /// Whether this glyph lives on the heap.
    #[inline]
    pub const fn is_spilled(&self) -> bool {
        matches!(self.0, Repr::Spilled(_))
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<&str> for Glyph {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<char> for Glyph {
    fn from(c: char) -> Self {
        Self::from_char(c)
    }
}

impl std::fmt::Debug for Glyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

/// A single grid cell.
///
/// The cell caches the display width of its glyph (1 or 2 columns) as
/// computed by the owning buffer's width oracle. The width is derived data
/// and takes no part in equality.
#[derive(Clone)]
pub struct Cell {
    glyph: Glyph,
    width: u8,
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

impl Cell {
    /// A space with the default style. Returned for out-of-range reads.
    pub const BLANK: Self = Self {
        glyph: Glyph::SPACE,
        width: 1,
        style: Style::DEFAULT,
    };

    /// An empty glyph with the default style: nothing drawn here.
    pub const TRANSPARENT: Self = Self {
        glyph: Glyph::EMPTY,
        width: 1,
        style: Style::DEFAULT,
    };

    /// Create a cell, measuring the glyph with the Unicode width tables.
    pub fn new(glyph: &str, style: Style) -> Self {
        Self::with_width(Glyph::new(glyph), super::unicode_display_width(glyph), style)
    }

    /// Create a cell with an explicit display width (clamped to 1 or 2).
    #[inline]
    pub const fn with_width(glyph: Glyph, width: u8, style: Style) -> Self {
        let width = if width >= 2 { 2 } else { 1 };
        Self {
            glyph,
            width,
            style,
        }
    }

    /// A space in the given style.
    #[inline]
    pub const fn blank(style: Style) -> Self {
        Self {
            glyph: Glyph::SPACE,
            width: 1,
            style,
        }
    }

    /// The glyph text (empty string for transparent cells).
    #[inline]
    pub fn glyph(&self) -> &str {
        self.glyph.as_str()
    }

    /// The glyph value.
    #[inline]
    pub const fn glyph_value(&self) -> &Glyph {
        &self.glyph
    }

    /// Display width in columns (1 or 2).
    #[inline]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// The cell's style.
    #[inline]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.style.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.style.bg
    }

    /// Whether the glyph is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyph.is_empty()
    }

    /// Whether the compositor should paint this cell over lower layers:
    /// it has a glyph or a non-black background.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        !self.glyph.is_empty() || !self.style.bg.is_black()
    }

    /// Replace the style (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl PartialEq for Cell {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.glyph == other.glyph && self.style == other.style
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.glyph.hash(state);
        self.style.hash(state);
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("glyph", &self.glyph)
            .field("width", &self.width)
            .field("fg", &self.style.fg)
            .field("bg", &self.style.bg)
            .field("modifiers", &self.style.modifiers)
            .finish()
    }
}
