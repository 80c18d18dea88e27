//! ToolForge Core Library
//!
//! This crate provides the configuration, error taxonomy and constants shared by
//! every ToolForge component.

pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
