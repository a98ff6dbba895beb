//! Tray icon rendering. Either the user's own image or a generated badge: a
//! solid square in the colour of the most urgent priority present, with the
//! total issue count drawn on top in white.

use std::path::Path;

use image::{imageops::FilterType, Rgba, RgbaImage};
use log::warn;

use crate::error::Result;

pub const ICON_SIZE: u32 = 64;

/// 5x7 digit bitmaps, one byte per row, bit 4 is the leftmost column.
const DIGITS: [[u8; 7]; 10] = [
    [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
    [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
    [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
    [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
    [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
    [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
    [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
    [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
    [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
];

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SCALE: u32 = 3;
const GLYPH_SPACING: u32 = 1;

/// ARGB32 pixmap in the layout the StatusNotifierItem protocol expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    pub width: i32,
    pub height: i32,
    pub data: Vec<u8>,
}

/// Render the tray icon. A configured image wins; when it is missing or
/// unreadable the generated badge takes over with a logged warning.
pub fn render(icon_path: Option<&Path>, color: [u8; 3], count: usize) -> Pixmap {
    if let Some(path) = icon_path {
        match load_custom(path) {
            Ok(pixmap) => return pixmap,
            Err(err) => warn!(
                "Failed to load icon {}, using the badge: {err}",
                path.display()
            ),
        }
    }
    badge(color, count)
}

fn load_custom(path: &Path) -> Result<Pixmap> {
    let img = image::open(path)?;
    let resized = img
        .resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Lanczos3)
        .to_rgba8();
    Ok(to_argb(resized))
}

/// Solid colour square with the count centered in white digits.
pub fn badge(color: [u8; 3], count: usize) -> Pixmap {
    let fill = Rgba([color[0], color[1], color[2], 255]);
    let mut img = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, fill);
    draw_count(&mut img, &badge_text(count));
    to_argb(img)
}

/// Counts above three digits would not fit; clamp them.
fn badge_text(count: usize) -> String {
    if count > 999 {
        "999".to_string()
    } else {
        count.to_string()
    }
}

fn draw_count(img: &mut RgbaImage, text: &str) {
    let white = Rgba([255, 255, 255, 255]);
    let glyph_w = GLYPH_WIDTH * GLYPH_SCALE;
    let glyph_h = GLYPH_HEIGHT * GLYPH_SCALE;
    let spacing = GLYPH_SPACING * GLYPH_SCALE;
    let digits: Vec<usize> = text
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|byte| (byte - b'0') as usize)
        .collect();
    if digits.is_empty() {
        return;
    }

    let total_w = glyph_w * digits.len() as u32 + spacing * (digits.len() as u32 - 1);
    let x0 = ICON_SIZE.saturating_sub(total_w) / 2;
    let y0 = ICON_SIZE.saturating_sub(glyph_h) / 2;

    for (index, digit) in digits.iter().enumerate() {
        let origin_x = x0 + index as u32 * (glyph_w + spacing);
        for (row, bits) in DIGITS[*digit].iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1u8 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..GLYPH_SCALE {
                    for dx in 0..GLYPH_SCALE {
                        let x = origin_x + col * GLYPH_SCALE + dx;
                        let y = y0 + row as u32 * GLYPH_SCALE + dy;
                        if x < ICON_SIZE && y < ICON_SIZE {
                            img.put_pixel(x, y, white);
                        }
                    }
                }
            }
        }
    }
}

/// RGBA to ARGB, the byte order D-Bus tray hosts want.
fn to_argb(img: RgbaImage) -> Pixmap {
    let (width, height) = img.dimensions();
    let rgba = img.into_raw();
    let mut data = Vec::with_capacity(rgba.len());
    for pixel in rgba.chunks_exact(4) {
        data.push(pixel[3]);
        data.push(pixel[0]);
        data.push(pixel[1]);
        data.push(pixel[2]);
    }

    Pixmap {
        width: width as i32,
        height: height as i32,
        data,
    }
}
