//! Tracing initialization
//!
//! Console logging through `tracing-subscriber`, either human-readable or JSON.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry, DEFAULT_FILTER};
