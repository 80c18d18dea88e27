use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Scratch directory owned by a single request.
///
/// Dropping the workspace removes the directory recursively. Removal failures
/// are logged at debug level and otherwise ignored.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl Workspace {
    pub(crate) fn new(dir: TempDir) -> Self {
        Workspace {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        }
    }

    /// Root directory of this workspace
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collision-free path for a new file with the given extension
    /// (with or without the leading dot). Nothing is created on disk.
    pub fn new_file_path(&self, extension: &str) -> PathBuf {
        let ext = normalize_extension(extension);
        let name = match ext {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };
        self.path.join(name)
    }

    /// Persist an upload under a generated name that keeps the extension of
    /// `original_filename`.
    pub async fn stage(&self, original_filename: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let path = self.new_file_path(extension);

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.flush().await?;

        tracing::debug!(
            path = %path.display(),
            size_bytes = data.len(),
            "Staged upload in workspace"
        );

        Ok(path)
    }

    /// Create a named sub-directory (e.g. for per-page outputs).
    pub async fn create_subdir(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let path = self.path.join(name);
        fs::create_dir_all(&path).await?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = std::mem::take(&mut self.path);

        // Recursive removal blocks, keep it off the async workers.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_dir(dir, &path));
            }
            Err(_) => remove_dir(dir, &path),
        }
    }
}

fn remove_dir(dir: TempDir, path: &Path) {
    match dir.close() {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed workspace"),
        Err(e) => tracing::debug!(
            path = %path.display(),
            error = %e,
            "Failed to remove workspace"
        ),
    }
}

fn normalize_extension(extension: &str) -> Option<String> {
    let ext: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
