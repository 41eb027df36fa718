// tests/render_files.rs

//! Decodes images from disk and checks the terminal output end to end.

use blockterm::config::RenderConfig;
use blockterm::layout::{TerminalSize, FALLBACK_TERMINAL_SIZE};
use blockterm::render::{render_file, RenderMode};
use blockterm::sink::ColorMode;
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

fn write_png(name: &str, img: &RgbaImage) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blockterm-{}-{}.png", std::process::id(), name));
    img.save(&path).expect("failed to write test image");
    path
}

/// 8x16 pixels: two glyph cells stacked, each black on top of white.
fn stripes() -> RgbaImage {
    RgbaImage::from_fn(8, 16, |_, y| {
        if y % 8 < 4 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

fn raw_config() -> RenderConfig {
    RenderConfig {
        raw: true,
        ..RenderConfig::default()
    }
}

#[test_log::test]
fn raw_glyph_render_of_png() {
    let path = write_png("stripes", &stripes());
    let out = String::from_utf8(render_file(&path, &raw_config(), FALLBACK_TERMINAL_SIZE).unwrap()).unwrap();
    let cell = "\x1b[48;2;0;0;0m\x1b[38;2;255;255;255m\u{2584}";
    let row = format!("{cell}{cell}\x1b[m\n");
    assert_eq!(out, format!("{row}{row}"));
    let _ = std::fs::remove_file(path);
}

#[test_log::test]
fn palette_output_uses_indexed_escapes() {
    let path = write_png("palette", &stripes());
    let config = RenderConfig {
        color_mode: ColorMode::Palette256,
        mode: RenderMode::HalfBlock,
        ..raw_config()
    };
    let out = String::from_utf8(render_file(&path, &config, FALLBACK_TERMINAL_SIZE).unwrap()).unwrap();
    // 8 rows of 8 half-block cells.
    assert_eq!(out.lines().count(), 8);
    assert!(out.starts_with("\x1b[48;5;16m\x1b[38;5;16m\u{2584}"));
    assert!(!out.contains(";2;"));
    let _ = std::fs::remove_file(path);
}

#[test_log::test]
fn transparent_pixels_render_black() {
    let img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 0]));
    let path = write_png("transparent", &img);
    let config = RenderConfig {
        mode: RenderMode::Space,
        ..raw_config()
    };
    let out = String::from_utf8(render_file(&path, &config, FALLBACK_TERMINAL_SIZE).unwrap()).unwrap();
    assert_eq!(out, "\x1b[48;2;0;0;0m  \x1b[48;2;0;0;0m  \x1b[m\n");
    let _ = std::fs::remove_file(path);
}

#[test_log::test]
fn resized_output_fits_requested_width() {
    let img = RgbaImage::from_pixel(64, 32, Rgba([10, 20, 30, 255]));
    let path = write_png("resize", &img);
    let config = RenderConfig {
        width: Some(5),
        ..RenderConfig::default()
    };
    let screen = TerminalSize { cols: 80, rows: 24 };
    let out = String::from_utf8(render_file(&path, &config, screen).unwrap()).unwrap();
    // 5 cells = 20 px wide, 10 px tall: one full row of glyph cells.
    assert_eq!(out.lines().count(), 1);
    assert_eq!(out.matches("\x1b[48;2;").count(), 5);
    let _ = std::fs::remove_file(path);
}

#[test_log::test]
fn missing_file_names_the_path() {
    let path = PathBuf::from("/nonexistent/blockterm-missing.png");
    let err = render_file(&path, &raw_config(), FALLBACK_TERMINAL_SIZE).unwrap_err();
    assert_eq!(err.to_string(), format!("Cannot open file {}", path.display()));
}
