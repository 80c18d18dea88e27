//! PDF rasterisation via pdfium
//!
//! pdfium is loaded at runtime, either from an explicit library path or from
//! the system library search path.

use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, ConversionResult};
use crate::image::compression::encode_jpeg;
use crate::traits::{ConversionOutput, Converter};
use crate::validator::InputKind;

const PAGE_JPEG_QUALITY: u8 = 90;
const POINTS_PER_INCH: f32 = 72.0;

/// Raster output format for rendered pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Jpeg,
    Png,
}

impl RasterFormat {
    pub fn parse(value: &str) -> ConversionResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "jpg" | "jpeg" => Ok(RasterFormat::Jpeg),
            "png" => Ok(RasterFormat::Png),
            other => Err(ConversionError::InvalidParameter(format!(
                "Unsupported image format: {} (expected jpg or png)",
                other
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
        }
    }
}

/// Page rasteriser
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    library_path: Option<PathBuf>,
    dpi: u16,
}

impl PdfRenderer {
    pub fn new(library_path: Option<PathBuf>, dpi: u16) -> Self {
        Self { library_path, dpi }
    }

    fn bind(&self) -> ConversionResult<Pdfium> {
        let bindings = match &self.library_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ConversionError::Render(format!("Failed to load pdfium: {:?}", e)))?;

        Ok(Pdfium::new(bindings))
    }

    /// Render every page of `input` into `out_dir` as `page_{i}.{ext}`, with `i`
    /// counted from 0. Paths are returned in page order.
    pub fn render_pages(
        &self,
        input: &Path,
        out_dir: &Path,
        format: RasterFormat,
    ) -> ConversionResult<Vec<PathBuf>> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_file(input, None)
            .map_err(|e| ConversionError::Render(format!("Failed to open PDF: {:?}", e)))?;

        let scale = self.dpi as f32 / POINTS_PER_INCH;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

        let mut outputs = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                ConversionError::Render(format!("Failed to render page {}: {:?}", index + 1, e))
            })?;

            let image = DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8());
            let path = out_dir.join(format!("page_{}.{}", index, format.extension()));
            match format {
                RasterFormat::Jpeg => {
                    std::fs::write(&path, encode_jpeg(&image, PAGE_JPEG_QUALITY)?)?;
                }
                RasterFormat::Png => {
                    image.save_with_format(&path, ::image::ImageFormat::Png)?;
                }
            }

            tracing::debug!(
                page = index + 1,
                width = image.width(),
                height = image.height(),
                "Rendered page"
            );
            outputs.push(path);
        }

        Ok(outputs)
    }
}

/// PDF → page images
pub struct PdfToImage {
    pub renderer: PdfRenderer,
    pub format: RasterFormat,
}

impl Converter for PdfToImage {
    fn label(&self) -> &'static str {
        "PDF → image"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Pdf
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        _stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        let pages = self.renderer.render_pages(input, out_dir, self.format)?;
        ConversionOutput::from_paths(pages)
    }
}
