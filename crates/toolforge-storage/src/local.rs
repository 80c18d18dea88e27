use crate::traits::{StorageError, StorageResult, WorkspaceProvider};
use crate::workspace::Workspace;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use toolforge_core::constants::WORKSPACE_PREFIX;

/// Workspaces on the local filesystem
#[derive(Clone, Debug)]
pub struct LocalWorkspaceProvider {
    root: PathBuf,
}

impl LocalWorkspaceProvider {
    /// Create a provider rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create temp directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalWorkspaceProvider { root })
    }
}

#[async_trait]
impl WorkspaceProvider for LocalWorkspaceProvider {
    async fn create(&self) -> StorageResult<Workspace> {
        let root = self.root.clone();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(WORKSPACE_PREFIX)
                .tempdir_in(&root)
        })
        .await
        .map_err(|e| StorageError::CreateFailed(format!("Task join error: {}", e)))?
        .map_err(|e| StorageError::CreateFailed(e.to_string()))?;

        let workspace = Workspace::new(dir);
        tracing::debug!(path = %workspace.path().display(), "Created workspace");
        Ok(workspace)
    }

    async fn sweep_stale(&self, max_age: Duration) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.root).await?;
        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let is_workspace = name
                .to_str()
                .map(|n| n.starts_with(WORKSPACE_PREFIX))
                .unwrap_or(false);
            if !is_workspace {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_dir() => m,
                _ => continue,
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < max_age {
                continue;
            }

            let path = entry.path();
            match fs::remove_dir_all(&path).await {
                Ok(()) => {
                    removed += 1;
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Removed stale workspace");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale workspace");
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, root = %self.root.display(), "Stale workspace sweep complete");
        }

        Ok(removed)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
