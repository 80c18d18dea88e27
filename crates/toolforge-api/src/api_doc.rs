//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ToolForge API",
        version = "0.1.0",
        description = "File conversion and utility API. Convert between PDF, DOCX, PPTX, XLSX and image formats, manipulate PDFs and images, generate QR codes and work with Base64 and JSON text."
    ),
    paths(
        // Service
        handlers::root::root,
        handlers::root::health,
        // Conversions
        handlers::convert::pdf_to_docx,
        handlers::convert::legacy_pdf_to_docx,
        handlers::convert::docx_to_pdf,
        handlers::convert::pdf_to_image,
        handlers::convert::image_to_pdf,
        handlers::convert::ppt_to_pdf,
        handlers::convert::excel_to_pdf,
        // PDF tools
        handlers::pdf_tools::merge_pdf,
        handlers::pdf_tools::split_pdf_handler,
        handlers::pdf_tools::compress_pdf_handler,
        handlers::pdf_tools::extract_text_handler,
        // Image tools
        handlers::image_tools::resize_image,
        handlers::image_tools::convert_image_format,
        handlers::image_tools::watermark_image,
        handlers::image_tools::compress_image,
        // Utilities
        handlers::utility::generate_qr,
        handlers::utility::base64_encode,
        handlers::utility::base64_decode,
        handlers::utility::format_json,
    ),
    components(
        schemas(
            handlers::root::InfoResponse,
            handlers::root::HealthResponse,
            handlers::pdf_tools::ExtractTextResponse,
            handlers::utility::Base64Response,
            handlers::utility::FormatJsonRequest,
            handlers::utility::FormatJsonResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "service", description = "Service information and health checks"),
        (name = "convert", description = "Document and image format conversions"),
        (name = "pdf", description = "Merge, split, compress and extract text from PDFs"),
        (name = "image", description = "Resize, convert, watermark and compress images"),
        (name = "utility", description = "QR codes, Base64 and JSON formatting")
    )
)]
pub struct ApiDoc;
