//! ToolForge API Library
//!
//! HTTP handlers, error mapping, artifact responses and application setup for
//! the ToolForge conversion service.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
