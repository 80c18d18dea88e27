//! Running conversions on the blocking pool

use std::path::Path;
use toolforge_core::AppError;
use toolforge_processing::ConversionResult;
use toolforge_storage::Workspace;

use crate::error::{conversion_failed, HttpAppError};
use crate::state::AppState;

/// Run `job` on the blocking pool once a conversion slot is free.
///
/// The slot is held by the worker thread itself, so a job that outlives the
/// timeout still counts against the limit until it returns.
pub async fn run_blocking<T, F>(state: &AppState, operation: &str, job: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let permit = state
        .conversion_slots
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| AppError::Internal("Conversion pool is closed".to_string()))?;

    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        job()
    });

    let timeout = state.config.conversion_timeout();
    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join_error)) => Err(AppError::Internal(format!(
            "{} worker failed: {}",
            operation, join_error
        ))),
        Err(_) => {
            tracing::warn!(
                operation = operation,
                timeout_secs = timeout.as_secs(),
                "Conversion timed out"
            );
            Err(AppError::Timeout(format!(
                "{} did not finish within {}s",
                operation,
                timeout.as_secs()
            )))
        }
    }
}

/// Run a conversion inside `workspace` on the blocking pool.
///
/// The workspace travels with the job and comes back with its result; if the
/// job times out it is dropped (and deleted) when the worker finishes.
pub async fn run_in_workspace<T, F>(
    state: &AppState,
    workspace: Workspace,
    label: &'static str,
    job: F,
) -> Result<(Workspace, T), HttpAppError>
where
    F: FnOnce(&Path) -> ConversionResult<T> + Send + 'static,
    T: Send + 'static,
{
    let started = std::time::Instant::now();
    let (workspace, result) = run_blocking(state, label, move || {
        let result = job(workspace.path());
        (workspace, result)
    })
    .await?;

    match result {
        Ok(value) => {
            tracing::info!(
                conversion = label,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Conversion finished"
            );
            Ok((workspace, value))
        }
        Err(err) => Err(conversion_failed(label, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use toolforge_core::config::ServiceConfig;
    use toolforge_core::Config;
    use toolforge_storage::{LocalWorkspaceProvider, WorkspaceProvider};

    async fn single_slot_state(root: &Path) -> AppState {
        let vars: HashMap<&str, String> = HashMap::from([
            ("TEMP_DIR", root.to_string_lossy().to_string()),
            ("CONVERSION_TIMEOUT_SECS", "1".to_string()),
            ("MAX_CONCURRENT_CONVERSIONS", "1".to_string()),
        ]);
        let config = ServiceConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let provider = LocalWorkspaceProvider::new(root).await.unwrap();
        AppState::new(Config(Box::new(config)), Arc::new(provider))
    }

    async fn eventually(check: impl Fn() -> bool) -> bool {
        for _ in 0..100 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_blocking_returns_value() {
        let root = tempfile::tempdir().unwrap();
        let state = single_slot_state(root.path()).await;

        let value = run_blocking(&state, "sum", || 2 + 2).await.unwrap();
        assert_eq!(value, 4);
        assert_eq!(state.conversion_slots.available_permits(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_job_times_out_and_keeps_its_slot() {
        let root = tempfile::tempdir().unwrap();
        let state = single_slot_state(root.path()).await;

        let result = run_blocking(&state, "slow job", || {
            std::thread::sleep(Duration::from_secs(2));
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));

        // The worker is still sleeping and still owns the only slot.
        assert_eq!(state.conversion_slots.available_permits(), 0);
        assert!(eventually(|| state.conversion_slots.available_permits() == 1).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_timed_out_workspace_is_removed_after_worker_finishes() {
        let root = tempfile::tempdir().unwrap();
        let state = single_slot_state(root.path()).await;
        let workspace = state.workspaces.create().await.unwrap();
        let dir = workspace.path().to_path_buf();

        let result = run_in_workspace(&state, workspace, "slow conversion", |dir| {
            std::fs::write(dir.join("partial.bin"), b"x")?;
            std::thread::sleep(Duration::from_secs(2));
            Ok(())
        })
        .await;

        match result {
            Err(HttpAppError(AppError::Timeout(_))) => {}
            other => panic!("expected timeout, got {:?}", other.map(|_| ())),
        }
        assert!(dir.exists());
        assert!(eventually(|| !dir.exists()).await);
        assert!(eventually(|| state.conversion_slots.available_permits() == 1).await);
    }
}
