// src/render.rs

//! Turns a decoded RGBA image into rows of colored terminal cells.
//!
//! The image is alpha-premultiplied, then tiled from the top-left corner into
//! cells whose pixel footprint depends on the `RenderMode`. Partial cells on
//! the right and bottom edges are dropped. Each row of cells is terminated by
//! an attribute reset and a newline.

use crate::block::{Block, BLOCK_COLS, BLOCK_ROWS};
use crate::catalog::Catalog;
use crate::color::{Color, ColorDistance};
use crate::config::RenderConfig;
use crate::engine::GlyphMatcher;
use crate::glyph::push_glyph;
use crate::layout::{target_size, TerminalSize};
use crate::sink::{ColorSink, Layer, SGR_RESET};

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Glyph drawn by `RenderMode::HalfBlock`: background on top, foreground below.
const LOWER_HALF_BLOCK: char = '\u{2584}';

/// How many pixels one terminal cell represents and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One pixel per cell pair, drawn as two background-colored spaces.
    Space,
    /// Two vertically stacked pixels per cell, drawn with a lower half block.
    #[serde(rename = "half")]
    HalfBlock,
    /// An 8×4 block per cell, drawn with the best-fitting catalog glyph.
    #[default]
    Glyph,
}

impl RenderMode {
    /// Pixel footprint of one cell as `(width, height)`.
    pub const fn cell_size(self) -> (u32, u32) {
        match self {
            RenderMode::Space => (1, 1),
            RenderMode::HalfBlock => (1, 2),
            RenderMode::Glyph => (BLOCK_COLS as u32, BLOCK_ROWS as u32),
        }
    }

    /// Pixels per terminal column and per terminal row.
    pub const fn screen_scale(self) -> (f32, f32) {
        match self {
            // Each pixel is printed as two spaces.
            RenderMode::Space => (0.5, 1.0),
            RenderMode::HalfBlock => (1.0, 2.0),
            RenderMode::Glyph => (BLOCK_COLS as f32, BLOCK_ROWS as f32),
        }
    }
}

impl TryFrom<u8> for RenderMode {
    type Error = anyhow::Error;

    /// Maps the command line enhance level to a mode.
    fn try_from(level: u8) -> Result<Self> {
        match level {
            0 => Ok(RenderMode::Space),
            1 => Ok(RenderMode::HalfBlock),
            2 => Ok(RenderMode::Glyph),
            _ => anyhow::bail!("Enhance level should be between 0 and 2"),
        }
    }
}

/// Premultiplies every pixel's color channels by its alpha.
pub fn premultiply_alpha(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let c = Color::from(*px).premultiplied();
        px.0 = [c.r, c.g, c.b, c.a];
    }
}

/// Copies the 8×4 block whose top-left pixel is at (`x`, `y`).
pub fn block_at(img: &RgbaImage, x: u32, y: u32) -> Block {
    Block::from_fn(|row, col| Color::from(*img.get_pixel(x + col as u32, y + row as u32)))
}

/// Renders images cell by cell with a fixed mode, glyph matcher and sink.
pub struct Renderer<'a, D, S> {
    mode: RenderMode,
    matcher: GlyphMatcher<'a, D>,
    sink: S,
    parallel: bool,
}

impl<'a, D, S> Renderer<'a, D, S>
where
    D: ColorDistance + Sync,
    S: ColorSink + Sync,
{
    pub fn new(mode: RenderMode, catalog: Catalog<'a>, metric: D, sink: S) -> Self {
        Renderer {
            mode,
            matcher: GlyphMatcher::new(catalog, metric),
            sink,
            parallel: false,
        }
    }

    /// Renders rows on the rayon pool. Output is identical to sequential rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Renders an already premultiplied image.
    pub fn render(&self, img: &RgbaImage) -> Vec<u8> {
        let (_, cell_h) = self.mode.cell_size();
        let rows = img.height() / cell_h;
        debug!(
            "Rendering {}x{} image as {} rows in {:?} mode (parallel: {})",
            img.width(),
            img.height(),
            rows,
            self.mode,
            self.parallel
        );
        if self.parallel {
            let chunks: Vec<Vec<u8>> = (0..rows)
                .into_par_iter()
                .map(|row| self.render_row(img, row * cell_h))
                .collect();
            chunks.concat()
        } else {
            let mut out = Vec::new();
            for row in 0..rows {
                out.extend_from_slice(&self.render_row(img, row * cell_h));
            }
            out
        }
    }

    /// Renders the row of cells whose top pixel row is `y`.
    fn render_row(&self, img: &RgbaImage, y: u32) -> Vec<u8> {
        let (cell_w, _) = self.mode.cell_size();
        let mut out = Vec::new();
        let mut x = 0;
        while x + cell_w <= img.width() {
            self.render_cell(img, x, y, &mut out);
            x += cell_w;
        }
        out.extend_from_slice(SGR_RESET.as_bytes());
        out.push(b'\n');
        out
    }

    fn render_cell(&self, img: &RgbaImage, x: u32, y: u32, out: &mut Vec<u8>) {
        match self.mode {
            RenderMode::Space => {
                let px = Color::from(*img.get_pixel(x, y));
                self.sink.set_color(out, px, Layer::Background);
                out.extend_from_slice(b"  ");
            }
            RenderMode::HalfBlock => {
                let top = Color::from(*img.get_pixel(x, y));
                let bottom = Color::from(*img.get_pixel(x, y + 1));
                self.sink.set_color(out, top, Layer::Background);
                self.sink.set_color(out, bottom, Layer::Foreground);
                push_glyph(out, LOWER_HALF_BLOCK);
            }
            RenderMode::Glyph => {
                let block = block_at(img, x, y);
                self.matcher.render_block(&block, out, &self.sink);
            }
        }
    }
}

/// Decodes `path`, fits it to the terminal unless `config.raw` is set, and
/// renders it with the built-in catalog.
pub fn render_file(path: &Path, config: &RenderConfig, screen: TerminalSize) -> Result<Vec<u8>> {
    let decoded = image::open(path).with_context(|| format!("Cannot open file {}", path.display()))?;
    let mut img = decoded.to_rgba8();
    info!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );

    if !config.raw {
        let (w, h) = target_size(img.dimensions(), screen, config.mode, &config.size_request());
        debug!("Resizing {} to {}x{} pixels", path.display(), w, h);
        img = imageops::resize(&img, w, h, FilterType::CatmullRom);
    }
    premultiply_alpha(&mut img);

    let renderer = Renderer::new(config.mode, Catalog::builtin(), config.metric, config.color_mode)
        .with_parallel(config.parallel);
    Ok(renderer.render(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SquaredEuclidean;
    use crate::sink::TrueColor;
    use image::Rgba;
    use test_log::test;

    fn renderer(mode: RenderMode) -> Renderer<'static, SquaredEuclidean, TrueColor> {
        Renderer::new(mode, Catalog::builtin(), SquaredEuclidean, TrueColor)
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn enhance_levels_map_to_modes() {
        assert_eq!(RenderMode::try_from(0).unwrap(), RenderMode::Space);
        assert_eq!(RenderMode::try_from(1).unwrap(), RenderMode::HalfBlock);
        assert_eq!(RenderMode::try_from(2).unwrap(), RenderMode::Glyph);
        let err = RenderMode::try_from(3).unwrap_err();
        assert_eq!(err.to_string(), "Enhance level should be between 0 and 2");
    }

    #[test]
    fn premultiply_scales_channels() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([200, 100, 50, 0]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        premultiply_alpha(&mut img);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn space_mode_prints_two_spaces_per_pixel() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 255]));
        img.put_pixel(1, 0, Rgba([4, 5, 6, 255]));
        let out = text(renderer(RenderMode::Space).render(&img));
        assert_eq!(out, "\x1b[48;2;1;2;3m  \x1b[48;2;4;5;6m  \x1b[m\n");
    }

    #[test]
    fn half_block_mode_stacks_two_pixels() {
        let mut img = RgbaImage::from_pixel(1, 3, Rgba([9, 9, 9, 255]));
        img.put_pixel(0, 1, Rgba([7, 7, 7, 255]));
        // The third pixel row does not fill a cell and is dropped.
        let out = text(renderer(RenderMode::HalfBlock).render(&img));
        assert_eq!(out, "\x1b[48;2;9;9;9m\x1b[38;2;7;7;7m\u{2584}\x1b[m\n");
    }

    #[test]
    fn glyph_mode_tiles_blocks_and_drops_partial_cells() {
        // 9x17 pixels: two full cells across, two down.
        let img = RgbaImage::from_fn(9, 17, |_, y| {
            if y % 8 < 4 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = text(renderer(RenderMode::Glyph).render(&img));
        let cell = "\x1b[48;2;0;0;0m\x1b[38;2;255;255;255m\u{2584}";
        let row = format!("{cell}{cell}\x1b[m\n");
        assert_eq!(out, format!("{row}{row}"));
    }

    #[test]
    fn block_at_reads_row_major() {
        let img = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let block = block_at(&img, 4, 0);
        assert_eq!(block.get(0, 0), Color::rgb(4, 0, 0));
        assert_eq!(block.get(7, 3), Color::rgb(7, 7, 0));
    }

    #[test]
    fn parallel_output_matches_sequential() {
        let img = RgbaImage::from_fn(37, 45, |x, y| {
            Rgba([(x * 7) as u8, (y * 5) as u8, (x * y) as u8, 255])
        });
        for mode in [RenderMode::Space, RenderMode::HalfBlock, RenderMode::Glyph] {
            let sequential = renderer(mode).render(&img);
            let parallel = renderer(mode).with_parallel(true).render(&img);
            assert_eq!(sequential, parallel, "{mode:?}");
        }
    }

    #[test]
    fn image_smaller_than_a_cell_renders_nothing() {
        let img = RgbaImage::from_pixel(3, 7, Rgba([1, 1, 1, 255]));
        assert!(renderer(RenderMode::Glyph).render(&img).is_empty());
    }
}
