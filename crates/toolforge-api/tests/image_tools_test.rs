//! Image tool integration tests.
//!
//! Run with: `cargo test -p toolforge-api --test image_tools_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures;
use helpers::{content_disposition, content_type, file_part, setup_test_app};

fn png_form(width: u32, height: u32) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        file_part(fixtures::test_png(width, height), "photo.png", "image/png"),
    )
}

#[tokio::test]
async fn test_resize_image() {
    let app = setup_test_app().await;
    let form = png_form(120, 80)
        .add_text("width", "40")
        .add_text("height", "30");

    let response = app.client().post("/resize-image/").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(content_type(&response), "image/jpeg");
    assert!(content_disposition(&response).contains("resized.jpg"));
    assert_eq!(fixtures::image_dimensions(response.as_bytes()), (40, 30));
}

#[tokio::test]
async fn test_resize_requires_dimensions() {
    let app = setup_test_app().await;
    let form = png_form(10, 10).add_text("width", "40");

    let response = app.client().post("/resize-image/").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("height"));
}

#[tokio::test]
async fn test_resize_rejects_non_positive_dimensions() {
    let app = setup_test_app().await;
    let form = png_form(10, 10)
        .add_text("width", "0")
        .add_text("height", "10");

    let response = app.client().post("/resize-image/").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_convert_format() {
    let app = setup_test_app().await;
    let form = png_form(16, 16).add_text("format", "BMP");

    let response = app.client().post("/convert-format/").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(content_type(&response), "image/bmp");
    assert!(content_disposition(&response).contains("converted.bmp"));
    assert_eq!(
        image::guess_format(response.as_bytes()).unwrap(),
        image::ImageFormat::Bmp
    );
}

#[tokio::test]
async fn test_convert_format_rejects_unknown_target() {
    let app = setup_test_app().await;
    let form = png_form(16, 16).add_text("format", "heic");

    let response = app.client().post("/convert-format/").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_watermark_keeps_dimensions() {
    let app = setup_test_app().await;
    let form = png_form(200, 120)
        .add_text("text", "ToolForge")
        .add_text("opacity", "128")
        .add_text("font_size", "16");

    let response = app.client().post("/watermark/").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(content_type(&response), "image/jpeg");
    assert!(content_disposition(&response).contains("watermarked.jpg"));
    assert_eq!(fixtures::image_dimensions(response.as_bytes()), (200, 120));
}

#[tokio::test]
async fn test_watermark_rejects_zero_font_size() {
    let app = setup_test_app().await;
    let form = png_form(20, 20)
        .add_text("text", "x")
        .add_text("opacity", "100")
        .add_text("font_size", "0");

    let response = app.client().post("/watermark/").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_compress_image() {
    let app = setup_test_app().await;
    let form = png_form(256, 256).add_text("target_size", "200");

    let response = app.client().post("/compress-image/").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(content_type(&response), "image/jpeg");
    assert!(content_disposition(&response).contains("compressed.jpg"));
    assert_eq!(fixtures::image_dimensions(response.as_bytes()), (256, 256));
}

#[tokio::test]
async fn test_image_routes_reject_pdf_upload() {
    let app = setup_test_app().await;
    let form = MultipartForm::new()
        .add_part(
            "file",
            file_part(
                fixtures::numbered_pdf("P", 1),
                "doc.pdf",
                "application/pdf",
            ),
        )
        .add_text("target_size", "100");

    let response = app.client().post("/compress-image/").multipart(form).await;

    assert_eq!(response.status_code(), 400);
}
