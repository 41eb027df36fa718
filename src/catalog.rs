// src/catalog.rs

//! The catalog of glyph patterns searched for every 8×4 pixel block.
//!
//! Each `GlyphPattern` pairs a 32-bit partition mask with the character whose
//! shape resembles it. Bit `31 - i` of the mask covers cell `i = row * 4 + col`
//! of the block; a set bit puts that cell in the foreground group, a clear bit
//! in the background group.

use crate::block::{BLOCK_CELLS, BLOCK_COLS};
use std::fmt;

/// Glyph used when no pattern with an empty mask exists in a catalog.
pub const DEFAULT_BLANK: char = '\u{00a0}';

/// A binary partition of a block together with the glyph that depicts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphPattern {
    pub mask: u32,
    pub glyph: char,
}

impl GlyphPattern {
    pub const fn new(mask: u32, glyph: char) -> Self {
        GlyphPattern { mask, glyph }
    }

    /// Group (0 = background, 1 = foreground) of the cell at `row`, `col`.
    #[inline]
    pub const fn group(&self, row: usize, col: usize) -> usize {
        self.group_of_index(row * BLOCK_COLS + col)
    }

    #[inline]
    pub const fn group_of_index(&self, index: usize) -> usize {
        ((self.mask >> (BLOCK_CELLS - 1 - index)) & 1) as usize
    }

    pub const fn codepoint(&self) -> u32 {
        self.glyph as u32
    }

    /// Number of cells assigned to the foreground group.
    pub const fn foreground_cells(&self) -> u32 {
        self.mask.count_ones()
    }
}

impl fmt::Display for GlyphPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X} ({:#010x})", self.codepoint(), self.mask)
    }
}

/// Built-in patterns, in search order.
///
/// Shapes that are the exact inverse of an entry already present (upper half,
/// full block, three-quarter quadrants) are left out: swapping background and
/// foreground of the existing entry renders them identically.
pub static BUILTIN_PATTERNS: &[GlyphPattern] = &[
    GlyphPattern::new(0x0000_0000, '\u{00a0}'),
    // Block elements
    GlyphPattern::new(0x0000_000f, '\u{2581}'), // lower 1/8
    GlyphPattern::new(0x0000_00ff, '\u{2582}'), // lower 1/4
    GlyphPattern::new(0x0000_0fff, '\u{2583}'),
    GlyphPattern::new(0x0000_ffff, '\u{2584}'), // lower 1/2
    GlyphPattern::new(0x000f_ffff, '\u{2585}'),
    GlyphPattern::new(0x00ff_ffff, '\u{2586}'), // lower 3/4
    GlyphPattern::new(0x0fff_ffff, '\u{2587}'),
    GlyphPattern::new(0xeeee_eeee, '\u{258a}'), // left 3/4
    GlyphPattern::new(0xcccc_cccc, '\u{258c}'), // left 1/2
    GlyphPattern::new(0x8888_8888, '\u{258e}'), // left 1/4
    GlyphPattern::new(0x0000_cccc, '\u{2596}'), // quadrant lower left
    GlyphPattern::new(0x0000_3333, '\u{2597}'), // quadrant lower right
    GlyphPattern::new(0xcccc_0000, '\u{2598}'), // quadrant upper left
    GlyphPattern::new(0xcccc_3333, '\u{259a}'), // diagonal
    GlyphPattern::new(0x3333_0000, '\u{259d}'), // quadrant upper right
    // Box drawing, heavy lines only
    GlyphPattern::new(0x000f_f000, '\u{2501}'),
    GlyphPattern::new(0x6666_6666, '\u{2503}'),
    GlyphPattern::new(0x0007_7666, '\u{250f}'),
    GlyphPattern::new(0x000e_e666, '\u{2513}'),
    GlyphPattern::new(0x6667_7000, '\u{2517}'),
    GlyphPattern::new(0x666e_e000, '\u{251b}'),
    GlyphPattern::new(0x6667_7666, '\u{2523}'),
    GlyphPattern::new(0x666e_e666, '\u{252b}'),
    GlyphPattern::new(0x000f_f666, '\u{2533}'),
    GlyphPattern::new(0x666f_f000, '\u{253b}'),
    GlyphPattern::new(0x666f_f666, '\u{254b}'),
    GlyphPattern::new(0x000c_c000, '\u{2578}'),
    GlyphPattern::new(0x0006_6000, '\u{2579}'),
    GlyphPattern::new(0x0003_3000, '\u{257a}'),
    GlyphPattern::new(0x0006_6000, '\u{257b}'),
    GlyphPattern::new(0x0660_0660, '\u{254f}'),
    // Box drawing, light lines; each shape appears at both offsets
    GlyphPattern::new(0x000f_0000, '\u{2500}'),
    GlyphPattern::new(0x0000_f000, '\u{2500}'),
    GlyphPattern::new(0x4444_4444, '\u{2502}'),
    GlyphPattern::new(0x2222_2222, '\u{2502}'),
    GlyphPattern::new(0x000e_0000, '\u{2574}'),
    GlyphPattern::new(0x0000_e000, '\u{2574}'),
    GlyphPattern::new(0x4444_0000, '\u{2575}'),
    GlyphPattern::new(0x2222_0000, '\u{2575}'),
    GlyphPattern::new(0x0003_0000, '\u{2576}'),
    GlyphPattern::new(0x0000_3000, '\u{2576}'),
    GlyphPattern::new(0x0000_4444, '\u{2577}'),
    GlyphPattern::new(0x0000_2222, '\u{2577}'),
    // Miscellaneous technical
    GlyphPattern::new(0x4444_4444, '\u{23a2}'),
    GlyphPattern::new(0x2222_2222, '\u{23a5}'),
    GlyphPattern::new(0x0f00_0000, '\u{23ba}'), // scan line 1
    GlyphPattern::new(0x00f0_0000, '\u{23bb}'), // scan line 3
    GlyphPattern::new(0x0000_0f00, '\u{23bc}'), // scan line 7
    GlyphPattern::new(0x0000_00f0, '\u{23bd}'), // scan line 9
    // Geometric shapes; most are too wide for a single cell
    GlyphPattern::new(0x0006_6000, '\u{25aa}'),
];

/// An ordered, non-empty, read-only list of patterns.
///
/// Order is significant: when two patterns score the same cost the earlier
/// one is kept.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    patterns: &'a [GlyphPattern],
    blank: char,
}

impl<'a> Catalog<'a> {
    /// Wraps `patterns` as a catalog.
    ///
    /// # Panics
    /// Panics if `patterns` is empty; the search has no meaningful answer
    /// without at least one candidate.
    pub fn new(patterns: &'a [GlyphPattern]) -> Self {
        assert!(!patterns.is_empty(), "glyph catalog must not be empty");
        let blank = patterns
            .iter()
            .find(|p| p.mask == 0)
            .map_or(DEFAULT_BLANK, |p| p.glyph);
        Catalog { patterns, blank }
    }

    pub fn patterns(&self) -> &'a [GlyphPattern] {
        self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'a, GlyphPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false; kept alongside `len` for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Glyph reported before any pattern has been scored.
    pub fn blank(&self) -> char {
        self.blank
    }
}

impl Catalog<'static> {
    pub fn builtin() -> Self {
        Catalog::new(BUILTIN_PATTERNS)
    }
}

impl Default for Catalog<'static> {
    fn default() -> Self {
        Catalog::builtin()
    }
}

impl<'a> IntoIterator for &Catalog<'a> {
    type Item = &'a GlyphPattern;
    type IntoIter = std::slice::Iter<'a, GlyphPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BLOCK_ROWS;
    use test_log::test;

    #[test]
    fn builtin_catalog_starts_with_blank() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), BUILTIN_PATTERNS.len());
        assert_eq!(catalog.patterns()[0].mask, 0);
        assert_eq!(catalog.blank(), '\u{00a0}');
    }

    #[test]
    fn every_pattern_partitions_all_cells() {
        for pattern in &Catalog::builtin() {
            let mut seen = [false; BLOCK_CELLS];
            let mut counts = [0usize; 2];
            for row in 0..BLOCK_ROWS {
                for col in 0..BLOCK_COLS {
                    let index = row * BLOCK_COLS + col;
                    assert!(!seen[index]);
                    seen[index] = true;
                    counts[pattern.group(row, col)] += 1;
                }
            }
            assert!(seen.iter().all(|&s| s), "{pattern} leaves a cell out");
            assert_eq!(counts[0] + counts[1], BLOCK_CELLS);
            assert_eq!(counts[1] as u32, pattern.foreground_cells());
        }
    }

    #[test]
    fn lower_half_covers_bottom_four_rows() {
        let lower_half = BUILTIN_PATTERNS
            .iter()
            .find(|p| p.glyph == '\u{2584}')
            .copied()
            .unwrap();
        for row in 0..BLOCK_ROWS {
            for col in 0..BLOCK_COLS {
                assert_eq!(lower_half.group(row, col), usize::from(row >= 4));
            }
        }
    }

    #[test]
    fn left_quarter_is_first_column() {
        let p = GlyphPattern::new(0x8888_8888, '\u{258e}');
        for row in 0..BLOCK_ROWS {
            assert_eq!(p.group(row, 0), 1);
            assert_eq!(p.group(row, 1), 0);
        }
        assert_eq!(p.group_of_index(0), 1);
        assert_eq!(p.group_of_index(31), 0);
    }

    #[test]
    fn blank_falls_back_when_no_empty_mask() {
        let patterns = [GlyphPattern::new(0x0000_ffff, '\u{2584}')];
        assert_eq!(Catalog::new(&patterns).blank(), DEFAULT_BLANK);
        let patterns = [
            GlyphPattern::new(0x0000_ffff, '\u{2584}'),
            GlyphPattern::new(0, ' '),
        ];
        assert_eq!(Catalog::new(&patterns).blank(), ' ');
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_catalog_is_rejected() {
        let _ = Catalog::new(&[]);
    }
}
