//! Service-wide constants.

/// Service name used in logs and the info endpoint.
pub const SERVICE_NAME: &str = "toolforge";

/// Human-readable banner returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to ToolForge Backend 🚀";

/// Prefix of every per-request workspace directory.
pub const WORKSPACE_PREFIX: &str = "toolforge-";

/// Default allowed origin (the hosted frontend).
pub const DEFAULT_CORS_ORIGIN: &str = "https://toolforge-frontend.onrender.com";
