//! Line display style

use serde::{Deserialize, Serialize};

/// Shape of a line badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Plain rectangle
    #[default]
    Rect,
    /// Rectangle with rounded corners
    Rounded,
    /// Circle
    Circle,
}

/// Display colors of a line, ARGB encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    /// Badge shape
    #[serde(default)]
    pub shape: Shape,
    /// Background color
    pub background_color: u32,
    /// Foreground (text) color
    pub foreground_color: u32,
    /// Border color, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<u32>,
}

impl Style {
    /// Opaque white
    pub const WHITE: u32 = 0xffff_ffff;
    /// Opaque black
    pub const BLACK: u32 = 0xff00_0000;

    /// Create a style with the given colors
    #[must_use]
    pub const fn new(shape: Shape, background_color: u32, foreground_color: u32) -> Self {
        Self {
            shape,
            background_color,
            foreground_color,
            border_color: None,
        }
    }

    /// Style with a background color and a readable foreground picked for it
    #[must_use]
    pub fn with_background(shape: Shape, background_color: u32) -> Self {
        let foreground = if perceived_brightness(background_color) > 0.5 {
            Self::BLACK
        } else {
            Self::WHITE
        };
        Self::new(shape, background_color, foreground)
    }

    /// Parse `#RRGGBB` or `RRGGBB` into an opaque ARGB color
    #[must_use]
    pub fn parse_rgb(value: &str) -> Option<u32> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(|rgb| 0xff00_0000 | rgb)
    }
}

fn perceived_brightness(argb: u32) -> f64 {
    let r = f64::from((argb >> 16) & 0xff);
    let g = f64::from((argb >> 8) & 0xff);
    let b = f64::from(argb & 0xff);
    (0.299f64.mul_add(r, 0.587f64.mul_add(g, 0.114 * b))) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_hex() {
        assert_eq!(Style::parse_rgb("#ff0000"), Some(0xffff_0000));
        assert_eq!(Style::parse_rgb("00ff00"), Some(0xff00_ff00));
        assert_eq!(Style::parse_rgb("#fff"), None);
        assert_eq!(Style::parse_rgb("zzzzzz"), None);
    }

    #[test]
    fn foreground_contrasts_with_background() {
        let dark = Style::with_background(Shape::Rounded, 0xff00_0080);
        assert_eq!(dark.foreground_color, Style::WHITE);

        let light = Style::with_background(Shape::Rect, 0xffff_ff00);
        assert_eq!(light.foreground_color, Style::BLACK);
    }
}
