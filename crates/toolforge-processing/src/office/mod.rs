//! Office document conversions
//!
//! Text-level conversions between PDF and the Office Open XML formats. DOCX and
//! PPTX are read straight from their zip containers; spreadsheets go through
//! calamine. PDF output is laid out by [`crate::pdf::layout`].

pub mod docx;
pub mod ooxml;
pub mod pptx;
pub mod xlsx;

pub use docx::{DocxToPdf, PdfToDocx};
pub use pptx::PresentationToPdf;
pub use xlsx::SpreadsheetToPdf;
