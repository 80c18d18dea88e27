//! Test helpers: build the router over an isolated temp dir for integration tests.
//!
//! Run from workspace root: `cargo test -p toolforge-api`.

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;
use toolforge_api::setup;
use toolforge_core::config::ServiceConfig;
use toolforge_core::constants::WORKSPACE_PREFIX;
use toolforge_core::Config;

/// Test application: server plus the temp dir backing its workspaces.
pub struct TestApp {
    pub server: TestServer,
    pub workspace_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Workspace directories still present under the temp root
    pub fn live_workspaces(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.workspace_root)
            .expect("Failed to read workspace root")
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(WORKSPACE_PREFIX)
            })
            .map(|entry| entry.path())
            .collect()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with extra configuration variables layered over the defaults.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let workspace_root = temp_dir.path().join("workspaces");

    let mut vars: HashMap<String, String> = HashMap::from([
        (
            "TEMP_DIR".to_string(),
            workspace_root.to_string_lossy().to_string(),
        ),
        ("CORS_ORIGINS".to_string(), "*".to_string()),
        ("MAX_UPLOAD_SIZE_MB".to_string(), "5".to_string()),
        ("CONVERSION_TIMEOUT_SECS".to_string(), "60".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let service_config =
        ServiceConfig::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");
    let config = Config(Box::new(service_config));

    let state = setup::build_state(config)
        .await
        .expect("Failed to build app state");
    let router = setup::routes::setup_routes(&state.config, state.clone())
        .expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        workspace_root,
        _temp_dir: temp_dir,
    }
}

/// Multipart part carrying a file upload
pub fn file_part(data: Vec<u8>, filename: &str, mime_type: &str) -> Part {
    Part::bytes(data).file_name(filename).mime_type(mime_type)
}

/// Single-file form under the `file` field
pub fn file_form(data: Vec<u8>, filename: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part("file", file_part(data, filename, mime_type))
}

/// Value of the Content-Disposition header
pub fn content_disposition(response: &axum_test::TestResponse) -> String {
    response
        .header("content-disposition")
        .to_str()
        .expect("Non-ASCII Content-Disposition")
        .to_string()
}

pub fn content_type(response: &axum_test::TestResponse) -> String {
    response
        .header("content-type")
        .to_str()
        .expect("Non-ASCII Content-Type")
        .to_string()
}
