//! Bitmap digit font for cell labels.
//!
//! Labels are slide ordinals, so only `0-9` have glyphs. Each glyph is a 5x7
//! bitmap (one `u8` per row, bit 4 is the leftmost column) scaled by an
//! integer factor to fit the label band.

use crate::layout::Rect;
use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

/// Integer glyph scale so the digits take roughly 60% of the band height.
pub fn scale_for_band(band_height: u32) -> u32 {
    (band_height * 3 / 5 / GLYPH_HEIGHT).max(1)
}

/// Pixel width of `text` at `scale`, one scaled column of spacing between
/// glyphs.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * GLYPH_WIDTH * scale + (n - 1) * scale
}

/// Fill `band` with `fill` and draw `text` centred in it. Pixels are clipped
/// to both the band and the canvas; non-digit characters leave a blank slot.
pub fn draw_label(canvas: &mut RgbaImage, band: Rect, text: &str, fill: Rgba<u8>, ink: Rgba<u8>) {
    fill_rect(canvas, band, fill);
    if band.height == 0 || band.width == 0 {
        return;
    }

    let scale = scale_for_band(band.height);
    let width = text_width(text, scale);
    let height = GLYPH_HEIGHT * scale;
    let left = band.x + band.width.saturating_sub(width) / 2;
    let top = band.y + band.height.saturating_sub(height) / 2;

    for (slot, ch) in text.chars().enumerate() {
        let Some(glyph) = ch.to_digit(10).map(|d| &DIGITS[d as usize]) else {
            continue;
        };
        let gx = left + slot as u32 * (GLYPH_WIDTH + 1) * scale;
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1u8 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let px = Rect {
                    x: gx + col * scale,
                    y: top + row as u32 * scale,
                    width: scale,
                    height: scale,
                };
                fill_clipped(canvas, px, band, ink);
            }
        }
    }
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let bounds = Rect { x: 0, y: 0, width: canvas.width(), height: canvas.height() };
    fill_clipped(canvas, rect, bounds, color);
}

fn fill_clipped(canvas: &mut RgbaImage, rect: Rect, clip: Rect, color: Rgba<u8>) {
    let x0 = rect.x.max(clip.x);
    let y0 = rect.y.max(clip.y);
    let x1 = rect.right().min(clip.right()).min(canvas.width());
    let y1 = rect.bottom().min(clip.bottom()).min(canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x, y, color);
        }
    }
}
