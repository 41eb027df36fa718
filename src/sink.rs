// src/sink.rs

//! Color sinks: the capability that turns a chosen color into terminal
//! output. The glyph search only sequences calls into a `ColorSink`; the
//! escape sequences themselves are produced here.

use crate::color::{Color, ColorDistance, SquaredEuclidean};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::Write as _;

const SGR_PREFIX: &str = "\x1b[";
const SGR_SUFFIX: char = 'm';
/// Clears all attributes; written at the end of every rendered row.
pub const SGR_RESET: &str = "\x1b[m";

/// Which color of a cell is being set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Foreground,
}

impl Layer {
    /// Leading SGR parameter for extended colors on this layer.
    fn sgr_selector(self) -> u8 {
        match self {
            Layer::Background => 48,
            Layer::Foreground => 38,
        }
    }
}

/// Writes a color for one layer of the current cell into `out`.
///
/// Sinks take `&self` and are expected not to fail; they append to an
/// in-memory buffer owned by the caller.
pub trait ColorSink {
    fn set_color(&self, out: &mut Vec<u8>, color: Color, layer: Layer);
}

impl<F> ColorSink for F
where
    F: Fn(&mut Vec<u8>, Color, Layer),
{
    fn set_color(&self, out: &mut Vec<u8>, color: Color, layer: Layer) {
        self(out, color, layer)
    }
}

/// 24-bit color: `ESC[48;2;R;G;Bm` / `ESC[38;2;R;G;Bm`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrueColor;

impl ColorSink for TrueColor {
    fn set_color(&self, out: &mut Vec<u8>, color: Color, layer: Layer) {
        // Writing into a Vec cannot fail.
        let _ = write!(
            out,
            "{}{};2;{};{};{}{}",
            SGR_PREFIX,
            layer.sgr_selector(),
            color.r,
            color.g,
            color.b,
            SGR_SUFFIX
        );
    }
}

// Constants for 256-color palette indexing
const COLOR_CUBE_OFFSET: usize = 16;
const COLOR_CUBE_SIZE: usize = 6; // 6x6x6 cube
const GRAYSCALE_OFFSET: usize = COLOR_CUBE_OFFSET + COLOR_CUBE_SIZE * COLOR_CUBE_SIZE * COLOR_CUBE_SIZE; // 232
const PALETTE_SIZE: usize = 256;

/// Cube level for component `c` in 0..6: 0, 95, 135, 175, 215, 255.
const fn cube_level(c: usize) -> u8 {
    if c == 0 {
        0
    } else {
        (c * 40 + 55) as u8
    }
}

/// RGB values of the xterm palette entries 16-255. Entries 0-15 are left
/// black and never searched: terminals theme them freely.
static XTERM_PALETTE: Lazy<[Color; PALETTE_SIZE]> = Lazy::new(|| {
    let mut palette = [Color::BLACK; PALETTE_SIZE];
    for (idx, entry) in palette
        .iter_mut()
        .enumerate()
        .take(GRAYSCALE_OFFSET)
        .skip(COLOR_CUBE_OFFSET)
    {
        let cube_idx = idx - COLOR_CUBE_OFFSET;
        let r = (cube_idx / (COLOR_CUBE_SIZE * COLOR_CUBE_SIZE)) % COLOR_CUBE_SIZE;
        let g = (cube_idx / COLOR_CUBE_SIZE) % COLOR_CUBE_SIZE;
        let b = cube_idx % COLOR_CUBE_SIZE;
        *entry = Color::rgb(cube_level(r), cube_level(g), cube_level(b));
    }
    for (idx, entry) in palette.iter_mut().enumerate().skip(GRAYSCALE_OFFSET) {
        let level = ((idx - GRAYSCALE_OFFSET) * 10 + 8) as u8;
        *entry = Color::rgb(level, level, level);
    }
    palette
});

/// RGB value of xterm palette entry `idx`, for entries 16-255.
pub fn palette_color(idx: u8) -> Option<Color> {
    let idx = idx as usize;
    (idx >= COLOR_CUBE_OFFSET).then(|| XTERM_PALETTE[idx])
}

/// Index of the palette entry closest to `color`; the lowest index wins ties.
pub fn nearest_palette_index(color: Color) -> u8 {
    let mut best_idx = COLOR_CUBE_OFFSET;
    let mut best_dist = u32::MAX;
    for (idx, &entry) in XTERM_PALETTE.iter().enumerate().skip(COLOR_CUBE_OFFSET) {
        let dist = SquaredEuclidean.distance(color, entry);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
            if dist == 0 {
                break;
            }
        }
    }
    best_idx as u8
}

/// 256-color output: `ESC[48;5;Nm` / `ESC[38;5;Nm` with the nearest entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette256;

impl ColorSink for Palette256 {
    fn set_color(&self, out: &mut Vec<u8>, color: Color, layer: Layer) {
        let idx = nearest_palette_index(color);
        let _ = write!(
            out,
            "{}{};5;{}{}",
            SGR_PREFIX,
            layer.sgr_selector(),
            idx,
            SGR_SUFFIX
        );
    }
}

/// Runtime choice between the built-in sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    TrueColor,
    Palette256,
}

impl ColorSink for ColorMode {
    fn set_color(&self, out: &mut Vec<u8>, color: Color, layer: Layer) {
        match self {
            ColorMode::TrueColor => TrueColor.set_color(out, color, layer),
            ColorMode::Palette256 => Palette256.set_color(out, color, layer),
        }
    }
}
