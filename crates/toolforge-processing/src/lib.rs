//! ToolForge Processing Library
//!
//! Conversion primitives behind every ToolForge route:
//! - Upload validation per input kind (validator)
//! - PDF page operations, rasterisation and text-PDF layout (pdf)
//! - Office readers and writers (office)
//! - Image transforms and JPEG compression (image)
//! - QR codes, base64 and JSON formatting (qr, encoding, json)
//!
//! Everything here is synchronous and CPU or disk bound; callers run it on a
//! blocking worker.

pub mod encoding;
pub mod error;
pub mod image;
pub mod json;
pub mod office;
pub mod pdf;
pub mod qr;
pub mod traits;
pub mod validator;

pub use error::{ConversionError, ConversionResult};
pub use traits::{ConversionOutput, Converter};
pub use validator::{InputKind, UploadValidator, ValidationError};
