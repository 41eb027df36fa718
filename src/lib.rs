//! blockterm library crate.
//!
//! Renders raster images as colored text by approximating each 8×4 pixel
//! block with the best-fitting glyph from a fixed catalog and two colors.

/// 8×4 pixel blocks and group statistics.
pub mod block;
/// The glyph pattern catalog.
pub mod catalog;
/// Packed RGBA colors and distance metrics.
pub mod color;
/// Command line and render settings.
pub mod config;
/// Best-fit glyph search.
pub mod engine;
/// UTF-8 glyph output.
pub mod glyph;
/// Terminal size and target image size.
pub mod layout;
/// Image tiling and render modes.
pub mod render;
/// Truecolor and 256-color escape sinks.
pub mod sink;

pub use block::Block;
pub use catalog::{Catalog, GlyphPattern, BUILTIN_PATTERNS};
pub use color::{Color, ColorDistance, Metric, SquaredEuclidean, WeightedEuclidean};
pub use engine::{Approximation, GlyphMatcher};
pub use render::{render_file, RenderMode, Renderer};
pub use sink::{ColorMode, ColorSink, Layer, Palette256, TrueColor};
