// src/block.rs

//! The 8×4 pixel `Block` handed to the glyph search, and the per-pattern
//! group statistics computed from it.

use crate::catalog::GlyphPattern;
use crate::color::Color;

/// Rows in a block; one terminal cell is twice as tall as it is wide.
pub const BLOCK_ROWS: usize = 8;
pub const BLOCK_COLS: usize = 4;
pub const BLOCK_CELLS: usize = BLOCK_ROWS * BLOCK_COLS;

/// An 8-row by 4-column grid of pixel colors, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub cells: [[Color; BLOCK_COLS]; BLOCK_ROWS],
}

impl Block {
    pub const fn new(cells: [[Color; BLOCK_COLS]; BLOCK_ROWS]) -> Self {
        Block { cells }
    }

    /// Every cell set to `color`.
    pub const fn uniform(color: Color) -> Self {
        Block {
            cells: [[color; BLOCK_COLS]; BLOCK_ROWS],
        }
    }

    /// Builds a block by calling `f(row, col)` for every cell.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Color) -> Self {
        let mut cells = [[Color::ZERO; BLOCK_COLS]; BLOCK_ROWS];
        for (row, line) in cells.iter_mut().enumerate() {
            for (col, cell) in line.iter_mut().enumerate() {
                *cell = f(row, col);
            }
        }
        Block { cells }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Color {
        self.cells[row][col]
    }

    /// Cells in scan order, top-to-bottom then left-to-right.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, &color)| (row, col, color))
        })
    }

    /// Mean color of the background and foreground groups `pattern` induces.
    pub fn group_means(&self, pattern: &GlyphPattern) -> GroupMeans {
        let mut sums = [GroupSum::default(); 2];
        for (row, col, color) in self.iter() {
            sums[pattern.group(row, col)].add(color);
        }
        GroupMeans::from_sums(sums)
    }

    /// The two-color block `pattern` would draw with `means`.
    pub fn reconstruct(pattern: &GlyphPattern, means: &GroupMeans) -> Block {
        Block::from_fn(|row, col| means.color(pattern.group(row, col)))
    }
}

impl From<[[Color; BLOCK_COLS]; BLOCK_ROWS]> for Block {
    fn from(cells: [[Color; BLOCK_COLS]; BLOCK_ROWS]) -> Self {
        Block::new(cells)
    }
}

/// Running channel sums for one group.
#[derive(Debug, Clone, Copy, Default)]
struct GroupSum {
    r: u32,
    g: u32,
    b: u32,
    count: u32,
}

impl GroupSum {
    #[inline]
    fn add(&mut self, color: Color) {
        self.r += color.r as u32;
        self.g += color.g as u32;
        self.b += color.b as u32;
        self.count += 1;
    }

    /// Truncated per-channel mean, or `None` for an empty group.
    fn mean(&self) -> Option<Color> {
        if self.count == 0 {
            return None;
        }
        Some(Color::rgb(
            (self.r / self.count) as u8,
            (self.g / self.count) as u8,
            (self.b / self.count) as u8,
        ))
    }
}

/// Mean colors of the two groups of a partitioned block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMeans {
    pub background: Color,
    pub foreground: Color,
}

impl GroupMeans {
    /// An empty group borrows the other group's mean. No cell maps to it, so
    /// the choice never affects cost, and a uniform block reports the same
    /// color for both layers.
    fn from_sums([bg, fg]: [GroupSum; 2]) -> Self {
        match (bg.mean(), fg.mean()) {
            (Some(background), Some(foreground)) => GroupMeans { background, foreground },
            (Some(only), None) | (None, Some(only)) => GroupMeans {
                background: only,
                foreground: only,
            },
            // A block always has cells, so at least one group is populated.
            (None, None) => GroupMeans {
                background: Color::ZERO,
                foreground: Color::ZERO,
            },
        }
    }

    #[inline]
    pub fn color(&self, group: usize) -> Color {
        if group == 0 {
            self.background
        } else {
            self.foreground
        }
    }
}
