//! ToolForge Storage Library
//!
//! Per-request scratch space for conversions. A [`WorkspaceProvider`] hands out
//! one [`Workspace`] per request; the workspace owns a uniquely named directory
//! under the configured temp root and removes it, with everything staged inside,
//! when it is dropped.
//!
//! # Layout
//!
//! - `{temp_root}/toolforge-XXXXXX/` - one directory per request
//! - `{uuid}{.ext}` - staged uploads and conversion outputs inside it
//!
//! Directories left behind by a crashed process are removed by
//! [`WorkspaceProvider::sweep_stale`] at startup.

pub mod local;
pub mod traits;
pub mod workspace;

pub use local::LocalWorkspaceProvider;
pub use traits::{StorageError, StorageResult, WorkspaceProvider};
pub use workspace::Workspace;
