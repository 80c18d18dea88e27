//! ToolForge Infrastructure Library
//!
//! Shared infrastructure for the ToolForge service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Zip archive creation for multi-file results

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "archive")]
pub mod archive;

#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "archive")]
pub use archive::write_zip_archive;
