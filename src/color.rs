// src/color.rs

//! Defines the packed RGBA `Color` used for every pixel that flows through the
//! renderer, and the pluggable squared-distance metrics the glyph search uses
//! to score reconstructions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single pixel color with 8-bit red, green, blue and alpha channels.
///
/// The packed 32-bit form stores `r` in the lowest byte and `a` in the
/// highest, so it is bit-identical to an RGBA byte buffer read as a
/// little-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black. Used as the placeholder before any pattern is scored.
    pub const ZERO: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Color { r, g, b, a }
    }

    pub const fn packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Scales the color channels by `a / 255`, leaving alpha untouched.
    ///
    /// Channels are truncated toward zero.
    pub fn premultiplied(self) -> Self {
        let scale = |c: u8| (c as u32 * self.a as u32 / 255) as u8;
        Color {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Color::from_packed(packed)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.packed()
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Color { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A perceptual squared distance between two colors.
///
/// Implementations must be deterministic, symmetric and non-negative, and
/// return zero exactly when the red, green and blue channels are equal.
/// Alpha is ignored.
pub trait ColorDistance {
    fn distance(&self, a: Color, b: Color) -> u32;
}

impl<F> ColorDistance for F
where
    F: Fn(Color, Color) -> u32,
{
    fn distance(&self, a: Color, b: Color) -> u32 {
        self(a, b)
    }
}

/// Per-channel squared differences `(dr², dg², db²)`.
#[inline]
fn channel_deltas(a: Color, b: Color) -> (u32, u32, u32) {
    let dr = a.r.abs_diff(b.r) as u32;
    let dg = a.g.abs_diff(b.g) as u32;
    let db = a.b.abs_diff(b.b) as u32;
    (dr * dr, dg * dg, db * db)
}

/// Unweighted `dr² + dg² + db²`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredEuclidean;

impl ColorDistance for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: Color, b: Color) -> u32 {
        let (r, g, b) = channel_deltas(a, b);
        r + g + b
    }
}

/// `2·dr² + 4·dg² + 3·db²`, a cheap weighting that tracks the eye's higher
/// sensitivity to green.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedEuclidean;

impl ColorDistance for WeightedEuclidean {
    #[inline]
    fn distance(&self, a: Color, b: Color) -> u32 {
        let (r, g, b) = channel_deltas(a, b);
        2 * r + 4 * g + 3 * b
    }
}

/// Selects one of the built-in metrics by name, e.g. from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    #[default]
    Weighted,
}

impl ColorDistance for Metric {
    #[inline]
    fn distance(&self, a: Color, b: Color) -> u32 {
        match self {
            Metric::Euclidean => SquaredEuclidean.distance(a, b),
            Metric::Weighted => WeightedEuclidean.distance(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn packed_layout_is_little_endian_rgba() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.packed(), 0x4433_2211);
        assert_eq!(Color::from_packed(0x4433_2211), c);
        for packed in [0u32, 1, 0xdead_beef, u32::MAX] {
            assert_eq!(Color::from_packed(packed).packed(), packed);
        }
    }

    #[test]
    fn premultiply_truncates_and_keeps_alpha() {
        assert_eq!(Color::rgba(200, 100, 50, 255).premultiplied(), Color::rgba(200, 100, 50, 255));
        assert_eq!(Color::rgba(200, 100, 50, 0).premultiplied(), Color::rgba(0, 0, 0, 0));
        // 201 * 128/255 = 100.89..
        assert_eq!(Color::rgba(201, 255, 1, 128).premultiplied(), Color::rgba(100, 128, 0, 128));
    }

    #[test]
    fn metrics_are_symmetric_and_zero_only_on_equal_rgb() {
        let a = Color::rgb(10, 20, 30);
        let b = Color::rgb(13, 16, 30);
        for metric in [Metric::Euclidean, Metric::Weighted] {
            assert_eq!(metric.distance(a, a), 0);
            assert_eq!(metric.distance(a, b), metric.distance(b, a));
            assert!(metric.distance(a, b) > 0);
            // alpha does not participate
            assert_eq!(metric.distance(a, Color::rgba(10, 20, 30, 0)), 0);
        }
        assert_eq!(SquaredEuclidean.distance(a, b), 9 + 16);
        assert_eq!(WeightedEuclidean.distance(a, b), 2 * 9 + 4 * 16);
    }

    #[test]
    fn closures_are_metrics() {
        let red_only = |a: Color, b: Color| a.r.abs_diff(b.r) as u32;
        assert_eq!(red_only.distance(Color::rgb(5, 0, 0), Color::rgb(1, 9, 9)), 4);
    }
}
