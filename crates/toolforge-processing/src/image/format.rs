use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::{ConversionError, ConversionResult};
use crate::image::{compression::encode_jpeg, decode_image};

const CONVERT_JPEG_QUALITY: u8 = 75;

/// Target of a format conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
}

impl TargetFormat {
    pub fn parse(value: &str) -> ConversionResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "gif" => Ok(TargetFormat::Gif),
            "bmp" => Ok(TargetFormat::Bmp),
            "webp" => Ok(TargetFormat::WebP),
            "tiff" | "tif" => Ok(TargetFormat::Tiff),
            other => Err(ConversionError::InvalidParameter(format!(
                "Unsupported format: {} (expected jpeg, png, gif, bmp, webp or tiff)",
                other
            ))),
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::Gif => "image/gif",
            TargetFormat::Bmp => "image/bmp",
            TargetFormat::WebP => "image/webp",
            TargetFormat::Tiff => "image/tiff",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::Gif => ImageFormat::Gif,
            TargetFormat::Bmp => ImageFormat::Bmp,
            TargetFormat::WebP => ImageFormat::WebP,
            TargetFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Re-encode `data` in `target`. JPEG output is flattened to RGB; other
/// formats keep an alpha channel when the source has one.
pub fn convert_format(data: &[u8], target: TargetFormat) -> ConversionResult<Bytes> {
    let img = decode_image(data)?;

    if target == TargetFormat::Jpeg {
        return encode_jpeg(&img, CONVERT_JPEG_QUALITY);
    }

    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut buffer = Vec::new();
    normalized.write_to(&mut Cursor::new(&mut buffer), target.image_format())?;
    Ok(Bytes::from(buffer))
}
