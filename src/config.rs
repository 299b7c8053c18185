//! Renderer configuration.

use crate::buffer::Rgb;
use crate::terminal::ColorDepth;
use thiserror::Error;

/// Errors produced while building a [`RenderConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The color depth name was not recognized.
    #[error("unknown color depth `{0}` (expected truecolor, 256 or 8)")]
    UnknownColorDepth(String),
    /// A color was not a `#rrggbb` hex string.
    #[error("invalid color `{0}` (expected #rrggbb)")]
    InvalidColor(String),
}

/// Configuration for the compositor and diff renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Color encoding used for every style-set.
    pub color_depth: ColorDepth,
    /// Opaque base painted under all layers.
    pub theme_background: Rgb,
    /// Initial capacity of the frame output buffer in bytes.
    pub output_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color_depth: ColorDepth::TrueColor,
            theme_background: Rgb::BLACK,
            output_capacity: 65536,
        }
    }
}

impl RenderConfig {
    /// Set the color depth (builder pattern).
    #[must_use]
    pub const fn with_color_depth(mut self, depth: ColorDepth) -> Self {
        self.color_depth = depth;
        self
    }

    /// Set the theme background (builder pattern).
    #[must_use]
    pub const fn with_theme_background(mut self, bg: Rgb) -> Self {
        self.theme_background = bg;
        self
    }

    /// Set the color depth from its name, e.g. `"256"`.
    pub fn color_depth_named(mut self, name: &str) -> Result<Self, ConfigError> {
        self.color_depth = name.parse()?;
        Ok(self)
    }

    /// Set the theme background from a `#rrggbb` string.
    pub fn theme_background_hex(mut self, hex: &str) -> Result<Self, ConfigError> {
        self.theme_background = parse_hex_color(hex)?;
        Ok(self)
    }
}

/// Parse a `#rrggbb` (or `rrggbb`) color.
pub fn parse_hex_color(hex: &str) -> Result<Rgb, ConfigError> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }
    u32::from_str_radix(digits, 16)
        .map(Rgb::from_u32)
        .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.color_depth, ColorDepth::TrueColor);
        assert_eq!(config.theme_background, Rgb::BLACK);
    }

    #[test]
    fn test_named_settings() {
        let config = RenderConfig::default()
            .color_depth_named("256")
            .and_then(|c| c.theme_background_hex("#1e1e2e"))
            .unwrap();
        assert_eq!(config.color_depth, ColorDepth::Ansi256);
        assert_eq!(config.theme_background, Rgb::new(0x1e, 0x1e, 0x2e));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            RenderConfig::default().color_depth_named("lots"),
            Err(ConfigError::UnknownColorDepth("lots".to_string()))
        );
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("+12345").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::UnknownColorDepth("x".into());
        assert_eq!(err.to_string(), "unknown color depth `x` (expected truecolor, 256 or 8)");
    }
}
