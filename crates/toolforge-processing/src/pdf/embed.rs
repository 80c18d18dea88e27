use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

use crate::error::ConversionResult;
use crate::image::compression::encode_jpeg;
use crate::image::decode_image;
use crate::traits::{ConversionOutput, Converter};
use crate::validator::InputKind;

const EMBED_JPEG_QUALITY: u8 = 90;

/// Single-page PDF showing `img` at one point per pixel
pub fn image_document(img: &DynamicImage) -> ConversionResult<Document> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let (width, height) = (rgb.width(), rgb.height());
    let jpeg = encode_jpeg(&rgb, EMBED_JPEG_QUALITY)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg.to_vec(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as f32).into(),
                    0.into(),
                    0.into(),
                    (height as f32).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as f32).into(), (height as f32).into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Image → PDF
pub struct ImageToPdf;

impl Converter for ImageToPdf {
    fn label(&self) -> &'static str {
        "Image → PDF"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Image
    }

    fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        stem: &str,
    ) -> ConversionResult<ConversionOutput> {
        let data = std::fs::read(input)?;
        let img = decode_image(&data)?;
        let mut doc = image_document(&img)?;

        let output = out_dir.join(format!("{}.pdf", stem));
        doc.save(&output)?;
        Ok(ConversionOutput::Single(output))
    }
}
