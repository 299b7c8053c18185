//! Color depth selection and palette quantization.
//!
//! The renderer never probes the terminal; callers pick a [`ColorDepth`]
//! and colors are reduced to it at emission time.

use crate::buffer::Rgb;
use crate::config::ConfigError;
use std::str::FromStr;

/// How many colors the display sink understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorDepth {
    /// 24-bit `38;2;r;g;b`.
    #[default]
    TrueColor,
    /// xterm 256-color palette `38;5;n`.
    Ansi256,
    /// The eight basic colors `30-37` / `40-47`.
    Ansi8,
}

impl FromStr for ColorDepth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "24bit" | "24" | "rgb" => Ok(Self::TrueColor),
            "256" | "ansi256" | "256color" => Ok(Self::Ansi256),
            "8" | "ansi8" | "basic" => Ok(Self::Ansi8),
            _ => Err(ConfigError::UnknownColorDepth(s.to_string())),
        }
    }
}

impl std::fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TrueColor => "truecolor",
            Self::Ansi256 => "256",
            Self::Ansi8 => "8",
        })
    }
}

/// Channel levels of the 6x6x6 cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Nearest cube level index for one channel.
const fn cube_step(v: u8) -> u8 {
    if v < 48 {
        0
    } else if v < 115 {
        1
    } else {
        (v - 35) / 40
    }
}

fn distance(a: Rgb, b: Rgb) -> u32 {
    let d = |x: u8, y: u8| {
        let d = i32::from(x) - i32::from(y);
        (d * d) as u32
    };
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}

/// Map a color to the closest xterm 256-palette entry (16-255).
///
/// Picks whichever of the color cube and the grayscale ramp is closer.
pub fn ansi256_index(color: Rgb) -> u8 {
    let (r, g, b) = (cube_step(color.r), cube_step(color.g), cube_step(color.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r as usize],
        CUBE_LEVELS[g as usize],
        CUBE_LEVELS[b as usize],
    );
    let cube_index = 16 + 36 * r + 6 * g + b;

    let avg = (u16::from(color.r) + u16::from(color.g) + u16::from(color.b)) / 3;
    let gray_step = if avg < 8 { 0 } else { ((avg - 8) / 10).min(23) as u8 };
    let gray_level = 8 + 10 * gray_step;
    let gray = Rgb::new(gray_level, gray_level, gray_level);

    if distance(color, gray) < distance(color, cube) {
        232 + gray_step
    } else {
        cube_index
    }
}

/// Map a color to one of the eight basic ANSI colors (0-7).
///
/// Each channel at or above half intensity sets its bit: red 1, green 2,
/// blue 4.
pub const fn ansi8_index(color: Rgb) -> u8 {
    (color.r >= 128) as u8 | ((color.g >= 128) as u8) << 1 | ((color.b >= 128) as u8) << 2
}
