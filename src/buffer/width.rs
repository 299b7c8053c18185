//! Glyph width oracle.
//!
//! Buffers measure glyphs through a plain function pointer so hosts can
//! swap in their own font tables. The renderer never measures; it reads
//! the width cached on each cell.

use unicode_width::UnicodeWidthStr;

/// Maps a glyph to the number of terminal columns it occupies (1 or 2).
pub type WidthFn = fn(&str) -> u8;

/// Default oracle backed by the Unicode East Asian Width tables.
///
/// Zero-width and control glyphs still occupy one cell.
pub fn unicode_display_width(glyph: &str) -> u8 {
    if UnicodeWidthStr::width(glyph) >= 2 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_narrow() {
        assert_eq!(unicode_display_width("a"), 1);
        assert_eq!(unicode_display_width(" "), 1);
    }

    #[test]
    fn test_cjk_is_wide() {
        assert_eq!(unicode_display_width("日"), 2);
        assert_eq!(unicode_display_width("한"), 2);
    }

    #[test]
    fn test_zero_width_occupies_a_cell() {
        assert_eq!(unicode_display_width(""), 1);
        assert_eq!(unicode_display_width("\u{200b}"), 1);
    }
}
