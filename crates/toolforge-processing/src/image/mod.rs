//! Image processing module
//!
//! - Exact resize (resize)
//! - Format conversion (format)
//! - Tiled text watermark (watermark)
//! - JPEG encoding and size-targeted compression (compression)

pub mod compression;
pub mod format;
pub mod resize;
pub mod watermark;

use image::{DynamicImage, ImageReader};
use std::io::Cursor;

use crate::error::{ConversionError, ConversionResult};

pub use compression::{compress_to_target, encode_jpeg, CompressedImage};
pub use format::TargetFormat;
pub use resize::resize_exact;
pub use watermark::{apply_text_watermark, WatermarkOptions};

/// Decode an image, detecting the format from its content
pub fn decode_image(data: &[u8]) -> ConversionResult<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ConversionError::Image(format!("Failed to read image: {}", e)))?;

    if reader.format().is_none() {
        return Err(ConversionError::Image("Unrecognized image format".to_string()));
    }

    Ok(reader.decode()?)
}
