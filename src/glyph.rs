// src/glyph.rs

//! Appends glyphs to an output buffer as UTF-8.

use log::warn;

/// Written in place of a code point that is not a Unicode scalar value.
pub const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// Appends the UTF-8 encoding of `c` (1 to 4 bytes).
#[inline]
pub fn push_glyph(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Appends the UTF-8 encoding of a raw code point.
///
/// Surrogates and values above `0x10FFFF` are written as U+FFFD.
pub fn push_codepoint(out: &mut Vec<u8>, codepoint: u32) {
    let c = char::from_u32(codepoint).unwrap_or_else(|| {
        warn!("Invalid code point {:#x}; writing replacement character", codepoint);
        REPLACEMENT
    });
    push_glyph(out, c);
}
