//! RGBA colors and their string form.
//!
//! Colors are stored and exchanged as CSS-style strings. Parsing accepts
//! `rgb(r, g, b)`, `rgba(r, g, b, a)` and hex with an optional `#` (`rgb`,
//! `rrggbb`, `rrggbbaa`). Hex is always opaque; a trailing alpha pair is
//! ignored. Anything else, including an empty or missing value, becomes
//! opaque black.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An RGBA color. Channels are 0-255, alpha is 0.0-1.0.
///
/// A fully transparent color keeps its RGB so it can be restored later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    /// Opaque black, the fallback for anything unparseable.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Transparent white, the default background of new text and rects.
    pub const TRANSPARENT: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 0.0,
    };

    /// Create a color, clamping alpha into `0.0..=1.0`.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = if a.is_nan() { 1.0 } else { a.clamp(0.0, 1.0) };
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a color string, falling back to opaque black.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::try_parse(input).unwrap_or(Self::BLACK)
    }

    /// Parse a color string, returning `None` when it is not recognized.
    #[must_use]
    pub fn try_parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.starts_with("rgb") {
            parse_functional(input)
        } else {
            parse_hex(input)
        }
    }

    /// Whether the color is fully transparent.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// The color with a different alpha, RGB untouched.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// `rgb(r,g,b)` without alpha, for formats that carry opacity separately.
    #[must_use]
    pub fn rgb_string(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::BLACK, Self::parse))
    }
}

/// `rgb(...)` / `rgba(...)` with three or four comma-separated components.
fn parse_functional(input: &str) -> Option<Rgba> {
    let body = input
        .strip_prefix("rgba(")
        .or_else(|| input.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }

    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    let a = match parts.get(3) {
        Some(alpha) => alpha.parse::<f32>().ok()?,
        None => 1.0,
    };
    Some(Rgba::new(r, g, b, a))
}

/// `rgb`, `rrggbb` or `rrggbbaa`, `#` optional; hex never carries alpha.
fn parse_hex(input: &str) -> Option<Rgba> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
            Some(Rgba::opaque(digit(0)?, digit(1)?, digit(2)?))
        }
        6 | 8 => {
            let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Rgba::opaque(pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}
