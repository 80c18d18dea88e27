use bytes::Bytes;
use image::imageops::FilterType;

use crate::error::{ConversionError, ConversionResult};
use crate::image::{compression::encode_jpeg, decode_image};

/// Largest accepted width or height
pub const MAX_DIMENSION: i64 = 10_000;
const RESIZE_JPEG_QUALITY: u8 = 75;

fn check_dimension(name: &str, value: i64) -> ConversionResult<u32> {
    if value <= 0 || value > MAX_DIMENSION {
        return Err(ConversionError::InvalidParameter(format!(
            "{} must be between 1 and {}",
            name, MAX_DIMENSION
        )));
    }
    Ok(value as u32)
}

/// Resize to exactly `width`×`height` (aspect ratio is not preserved) and
/// re-encode as JPEG.
pub fn resize_exact(data: &[u8], width: i64, height: i64) -> ConversionResult<Bytes> {
    let width = check_dimension("width", width)?;
    let height = check_dimension("height", height)?;

    let img = decode_image(data)?;
    let resized = img.resize_exact(width, height, FilterType::CatmullRom);

    encode_jpeg(&resized, RESIZE_JPEG_QUALITY)
}
