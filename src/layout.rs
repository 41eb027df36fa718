// src/layout.rs

//! Terminal size detection and the pixel size an image is resized to before
//! rendering.

use crate::render::RenderMode;
use libc::{winsize, STDOUT_FILENO, TIOCGWINSZ};
use log::{debug, info};
use std::mem;

/// Assumed when stdout is not a terminal or reports zero columns.
pub const FALLBACK_TERMINAL_SIZE: TerminalSize = TerminalSize { cols: 120, rows: 30 };

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub cols: u32,
    pub rows: u32,
}

impl TerminalSize {
    /// Size of the terminal attached to stdout, or the fallback.
    pub fn detect() -> Self {
        // SAFETY: TIOCGWINSZ only writes into the zero-initialised winsize we pass.
        let (res, ws) = unsafe {
            let mut ws: winsize = mem::zeroed();
            let res = libc::ioctl(STDOUT_FILENO, TIOCGWINSZ, &mut ws);
            (res, ws)
        };
        if res == -1 || ws.ws_col == 0 {
            info!(
                "Could not query terminal size ({}); assuming {}x{}",
                std::io::Error::last_os_error(),
                FALLBACK_TERMINAL_SIZE.cols,
                FALLBACK_TERMINAL_SIZE.rows
            );
            return FALLBACK_TERMINAL_SIZE;
        }
        let size = TerminalSize {
            cols: ws.ws_col as u32,
            rows: ws.ws_row as u32,
        };
        debug!("Terminal size: {}x{} cells", size.cols, size.rows);
        size
    }
}

/// Requested output size in terminal cells.
///
/// `Some(0)` means "the full screen" along that axis; `None` means "follow
/// the image's aspect ratio".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Share of the screen height used when neither dimension is given.
    pub percentage: u32,
}

impl Default for SizeRequest {
    fn default() -> Self {
        SizeRequest {
            width: None,
            height: None,
            percentage: 50,
        }
    }
}

/// `value * numerator / denominator` without intermediate overflow.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (value as u64 * numerator as u64 / denominator.max(1) as u64) as u32
}

/// Pixel size `image` (width, height) should be resized to.
///
/// Both results are at least 1.
pub fn target_size(
    image: (u32, u32),
    screen: TerminalSize,
    mode: RenderMode,
    request: &SizeRequest,
) -> (u32, u32) {
    let (img_w, img_h) = image;
    let (mul_w, mul_h) = mode.screen_scale();
    let screen_w = (screen.cols as f32 * mul_w) as u32;
    let screen_h = (screen.rows as f32 * mul_h) as u32;

    let (mut w, mut h) = (0, 0);
    match (request.width, request.height) {
        (None, None) => {
            h = scale(screen_h, request.percentage, 100);
            w = scale(img_w, h, img_h);
            if w > screen_w {
                w = screen_w;
                h = scale(img_h, w, img_w);
            }
        }
        (width, height) => {
            if let Some(cells) = width {
                w = if cells == 0 { screen_w } else { (cells as f32 * mul_w) as u32 };
                if height.is_none() {
                    h = scale(img_h, w, img_w);
                }
            }
            if let Some(cells) = height {
                h = if cells == 0 { screen_h } else { (cells as f32 * mul_h) as u32 };
                if width.is_none() {
                    w = scale(img_w, h, img_h);
                }
            }
        }
    }
    (w.max(1), h.max(1))
}
