use ab_glyph::{FontRef, PxScale};
use bytes::Bytes;
use image::{imageops, DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use crate::error::{ConversionError, ConversionResult};
use crate::image::{compression::encode_jpeg, decode_image};

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const MAX_FONT_SIZE: i64 = 1000;
const WATERMARK_JPEG_QUALITY: u8 = 75;

/// Text watermark parameters as submitted by the client
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    /// Alpha of the white glyphs, clamped to 0-255
    pub opacity: i64,
    /// Glyph size in pixels
    pub font_size: i64,
}

/// Tile `text` across the image and encode the result as JPEG.
///
/// Tiles start at the top-left corner and repeat every `font_size * 10` pixels
/// horizontally and `font_size * 8` pixels vertically.
pub fn apply_text_watermark(data: &[u8], options: &WatermarkOptions) -> ConversionResult<Bytes> {
    if options.font_size <= 0 || options.font_size > MAX_FONT_SIZE {
        return Err(ConversionError::InvalidParameter(format!(
            "font_size must be between 1 and {}",
            MAX_FONT_SIZE
        )));
    }
    let font_size = options.font_size as u32;
    let opacity = options.opacity.clamp(0, 255) as u8;

    let font = FontRef::try_from_slice(FONT_DATA)
        .map_err(|e| ConversionError::Image(format!("Failed to load font: {}", e)))?;
    let scale = PxScale::from(font_size as f32);

    let img = decode_image(data)?;
    let mut base = DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8();
    let (width, height) = base.dimensions();

    // Glyph coverage for every tile, then a white layer whose alpha is coverage * opacity
    let mut coverage = GrayImage::new(width, height);
    if !options.text.is_empty() {
        let step_x = (font_size * 10) as usize;
        let step_y = (font_size * 8) as usize;
        for y in (0..height).step_by(step_y) {
            for x in (0..width).step_by(step_x) {
                draw_text_mut(
                    &mut coverage,
                    Luma([255u8]),
                    x as i32,
                    y as i32,
                    scale,
                    &font,
                    &options.text,
                );
            }
        }
    }

    let layer = RgbaImage::from_fn(width, height, |x, y| {
        let c = coverage.get_pixel(x, y)[0] as u32;
        Rgba([255, 255, 255, (c * opacity as u32 / 255) as u8])
    });
    imageops::overlay(&mut base, &layer, 0, 0);

    encode_jpeg(&DynamicImage::ImageRgba8(base), WATERMARK_JPEG_QUALITY)
}
