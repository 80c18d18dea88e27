//! Workspace provider trait
//!
//! This module defines the WorkspaceProvider trait that hands out per-request
//! workspaces.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::workspace::Workspace;

/// Workspace operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create workspace: {0}")]
    CreateFailed(String),

    #[error("Failed to write file: {0}")]
    WriteFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for workspace operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Source of per-request workspaces.
///
/// Handlers depend on this trait rather than on a global temp directory so
/// tests can point the service at an isolated root.
#[async_trait]
pub trait WorkspaceProvider: Send + Sync {
    /// Create a fresh, empty workspace. Its directory is removed when the
    /// returned value is dropped.
    async fn create(&self) -> StorageResult<Workspace>;

    /// Remove workspace directories older than `max_age`. Returns how many
    /// were removed.
    async fn sweep_stale(&self, max_age: Duration) -> StorageResult<usize>;

    /// Directory under which workspaces are created.
    fn root(&self) -> &Path;
}
