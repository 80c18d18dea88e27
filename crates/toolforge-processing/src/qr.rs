//! QR code rendering

use bytes::Bytes;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use std::io::Cursor;

use crate::error::{ConversionError, ConversionResult};

/// Pixels per module
const BOX_SIZE: u32 = 10;
/// Quiet-zone width in modules
const BORDER: u32 = 4;

/// Encode `text` as a black-on-white QR code PNG
pub fn generate_png(text: &str) -> ConversionResult<Bytes> {
    if text.is_empty() {
        return Err(ConversionError::InvalidParameter(
            "text must not be empty".to_string(),
        ));
    }

    let code = QrCode::new(text.as_bytes()).map_err(|e| {
        ConversionError::InvalidParameter(format!("Cannot encode text as QR code: {}", e))
    })?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let size = (modules + 2 * BORDER) * BOX_SIZE;

    let img = GrayImage::from_fn(size, size, |x, y| {
        let mx = (x / BOX_SIZE) as i64 - BORDER as i64;
        let my = (y / BOX_SIZE) as i64 - BORDER as i64;
        let inside = mx >= 0 && my >= 0 && mx < modules as i64 && my < modules as i64;
        let dark = inside && colors[(my as u32 * modules + mx as u32) as usize] == Color::Dark;
        if dark {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });

    let mut buffer = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(Bytes::from(buffer))
}
