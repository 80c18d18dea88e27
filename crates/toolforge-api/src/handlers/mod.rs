pub mod convert;
pub mod image_tools;
pub mod pdf_tools;
pub mod root;
pub mod utility;
