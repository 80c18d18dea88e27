//! Service endpoint integration tests: root, health, OpenAPI and request ids.
//!
//! Run with: `cargo test -p toolforge-api --test service_test`

mod helpers;

use helpers::setup_test_app;
use toolforge_core::constants::WELCOME_MESSAGE;

#[tokio::test]
async fn test_root_returns_welcome_message() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], WELCOME_MESSAGE);
    assert_eq!(body["docs"], "/docs");
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn test_health_reports_temp_dir() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(
        body["temp_dir"],
        app.workspace_root.to_string_lossy().to_string()
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["info"]["title"], "ToolForge API");
    assert!(body["paths"]["/merge-pdf/"]["post"].is_object());
    assert!(body["paths"]["/convert/excel-to-pdf"]["post"].is_object());
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    let generated = response.header("x-request-id");
    assert!(!generated.is_empty());

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "trace-123")
        .await;
    assert_eq!(response.header("x-request-id"), "trace-123");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/does-not-exist").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_startup_removes_stale_workspaces() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("workspaces");
    let stale = root.join(format!(
        "{}leftover",
        toolforge_core::constants::WORKSPACE_PREFIX
    ));
    std::fs::create_dir_all(&stale).unwrap();
    let root_str = root.to_string_lossy().to_string();

    let app = helpers::setup_test_app_with(&[
        ("TEMP_DIR", root_str.as_str()),
        ("WORKSPACE_STALE_AFTER_SECS", "0"),
    ])
    .await;

    assert!(!stale.exists());
    assert_eq!(app.client().get("/health").await.status_code(), 200);
}

#[tokio::test]
async fn test_every_documented_route_is_served() {
    let app = setup_test_app().await;
    let spec: serde_json::Value = app.client().get("/api/openapi.json").await.json();
    let paths = spec["paths"].as_object().expect("paths object");
    assert_eq!(paths.len(), 21);

    for (path, item) in paths {
        let response = if item.get("get").is_some() {
            app.client().get(path).await
        } else {
            app.client().post(path).await
        };
        let status = response.status_code().as_u16();
        assert!(status != 404 && status != 405, "{path} returned {status}");
    }
}
