use bytes::Bytes;
use image::DynamicImage;

use crate::error::{ConversionError, ConversionResult};
use crate::image::decode_image;

/// First quality tried when compressing towards a target size
pub const START_QUALITY: u8 = 95;
pub const QUALITY_STEP: u8 = 5;
/// Quality is never lowered past this floor
pub const MIN_QUALITY: u8 = 10;

/// Compress to JPEG using mozjpeg. Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> ConversionResult<Bytes> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality.clamp(1, 100) as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(Bytes::from(jpeg_data))
}

#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub data: Bytes,
    /// Quality of the returned encoding
    pub quality: u8,
}

impl CompressedImage {
    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }
}

/// Re-encode as JPEG, lowering quality from 95 in steps of 5 until the result
/// is at most `target_kb` kilobytes or quality 10 is reached.
pub fn compress_to_target(data: &[u8], target_kb: i64) -> ConversionResult<CompressedImage> {
    if target_kb <= 0 {
        return Err(ConversionError::InvalidParameter(
            "target_size must be greater than 0".to_string(),
        ));
    }

    let img = decode_image(data)?;
    let target = target_kb as f64;

    let mut result = CompressedImage {
        data: encode_jpeg(&img, START_QUALITY)?,
        quality: START_QUALITY,
    };

    while result.size_kb() > target && result.quality > MIN_QUALITY {
        let quality = result.quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
        result = CompressedImage {
            data: encode_jpeg(&img, quality)?,
            quality,
        };
    }

    tracing::debug!(
        target_kb,
        size_kb = result.size_kb(),
        quality = result.quality,
        "Compressed image"
    );

    Ok(result)
}
