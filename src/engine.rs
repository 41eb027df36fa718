// src/engine.rs

//! Block glyph approximation.
//!
//! For one 8×4 block, every pattern in the catalog is tried: the block is
//! split into the pattern's two groups, each group is replaced by its mean
//! color, and the reconstruction is scored against the original with a
//! `ColorDistance`. The cheapest pattern wins; on equal cost the earlier
//! catalog entry is kept. The search is exhaustive, allocation-free and holds
//! no state between blocks.

use crate::block::Block;
use crate::catalog::{Catalog, GlyphPattern};
use crate::color::{Color, ColorDistance};
use crate::glyph::push_glyph;
use crate::sink::{ColorSink, Layer};
use log::trace;

/// The best two-color rendering of a block found in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approximation {
    pub glyph: char,
    pub background: Color,
    pub foreground: Color,
    /// Summed distance between the block and its reconstruction.
    pub cost: u64,
}

impl Approximation {
    pub fn codepoint(&self) -> u32 {
        self.glyph as u32
    }

    /// Writes background, then foreground, then the glyph.
    pub fn emit<S: ColorSink + ?Sized>(&self, out: &mut Vec<u8>, sink: &S) {
        sink.set_color(out, self.background, Layer::Background);
        sink.set_color(out, self.foreground, Layer::Foreground);
        push_glyph(out, self.glyph);
    }
}

/// Total distance between `original` and `rebuilt`, cell by cell.
pub fn reconstruction_cost<D: ColorDistance + ?Sized>(
    original: &Block,
    rebuilt: &Block,
    metric: &D,
) -> u64 {
    original
        .iter()
        .map(|(row, col, color)| metric.distance(color, rebuilt.get(row, col)) as u64)
        .sum()
}

/// Cost of drawing `block` with `pattern`, along with the colors it implies.
pub fn score_pattern<D: ColorDistance + ?Sized>(
    block: &Block,
    pattern: &GlyphPattern,
    metric: &D,
) -> Approximation {
    let means = block.group_means(pattern);
    let rebuilt = Block::reconstruct(pattern, &means);
    Approximation {
        glyph: pattern.glyph,
        background: means.background,
        foreground: means.foreground,
        cost: reconstruction_cost(block, &rebuilt, metric),
    }
}

/// Pairs a catalog with a distance metric and searches it block by block.
#[derive(Debug, Clone, Copy)]
pub struct GlyphMatcher<'a, D> {
    catalog: Catalog<'a>,
    metric: D,
}

impl<'a, D: ColorDistance> GlyphMatcher<'a, D> {
    pub fn new(catalog: Catalog<'a>, metric: D) -> Self {
        GlyphMatcher { catalog, metric }
    }

    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Finds the minimum-cost pattern for `block`.
    pub fn approximate(&self, block: &Block) -> Approximation {
        let mut best = Approximation {
            glyph: self.catalog.blank(),
            background: Color::ZERO,
            foreground: Color::ZERO,
            cost: u64::MAX,
        };
        for pattern in &self.catalog {
            let candidate = score_pattern(block, pattern, &self.metric);
            if candidate.cost < best.cost {
                best = candidate;
                if best.cost == 0 {
                    // Nothing later can be strictly cheaper.
                    break;
                }
            }
        }
        trace!(
            "Block matched {} (bg {}, fg {}, cost {})",
            best.glyph.escape_unicode(),
            best.background,
            best.foreground,
            best.cost
        );
        best
    }

    /// Finds the best pattern for `block` and writes it through `sink`.
    pub fn render_block<S: ColorSink + ?Sized>(
        &self,
        block: &Block,
        out: &mut Vec<u8>,
        sink: &S,
    ) -> Approximation {
        let best = self.approximate(block);
        best.emit(out, sink);
        best
    }
}
