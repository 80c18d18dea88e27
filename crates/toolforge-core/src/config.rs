//! Configuration module
//!
//! Server, upload, conversion and logging settings, loaded from the process
//! environment (and an optional `.env` file).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_CORS_ORIGIN, SERVICE_NAME};

const SERVER_HOST: &str = "0.0.0.0";
const SERVER_PORT: u16 = 8000;
const MAX_UPLOAD_SIZE_MB: usize = 50;
const MAX_CONCURRENT_CONVERSIONS: usize = 4;
const CONVERSION_TIMEOUT_SECS: u64 = 300;
const WORKSPACE_STALE_AFTER_SECS: u64 = 3600;
const RENDER_DPI: u16 = 200;

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub temp_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub max_concurrent_conversions: usize,
    pub conversion_timeout_secs: u64,
    pub workspace_stale_after_secs: u64,
    /// Explicit path to the pdfium shared library; system lookup when unset
    pub pdfium_library_path: Option<PathBuf>,
    pub render_dpi: u16,
    pub log_format: LogFormat,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_host(&self) -> &str {
        &self.inner().server_host
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn temp_dir(&self) -> &Path {
        &self.inner().temp_dir
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn max_concurrent_conversions(&self) -> usize {
        self.inner().max_concurrent_conversions
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().conversion_timeout_secs)
    }

    pub fn workspace_stale_after(&self) -> Duration {
        Duration::from_secs(self.inner().workspace_stale_after_secs)
    }

    pub fn pdfium_library_path(&self) -> Option<&Path> {
        self.inner().pdfium_library_path.as_deref()
    }

    pub fn render_dpi(&self) -> u16 {
        self.inner().render_dpi
    }

    pub fn log_format(&self) -> LogFormat {
        self.inner().log_format
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl ServiceConfig {
    /// Build the configuration from a key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let temp_dir = lookup("TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(SERVICE_NAME));

        let max_upload_size_mb: usize =
            parse_or(lookup("MAX_UPLOAD_SIZE_MB"), MAX_UPLOAD_SIZE_MB);
        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| SERVER_HOST.to_string()),
            server_port,
            environment,
            cors_origins,
            temp_dir,
            max_upload_size_bytes,
            max_concurrent_conversions: parse_or(
                lookup("MAX_CONCURRENT_CONVERSIONS"),
                MAX_CONCURRENT_CONVERSIONS,
            ),
            conversion_timeout_secs: parse_or(
                lookup("CONVERSION_TIMEOUT_SECS"),
                CONVERSION_TIMEOUT_SECS,
            ),
            workspace_stale_after_secs: parse_or(
                lookup("WORKSPACE_STALE_AFTER_SECS"),
                WORKSPACE_STALE_AFTER_SECS,
            ),
            pdfium_library_path: lookup("PDFIUM_LIBRARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            render_dpi: parse_or(lookup("RENDER_DPI"), RENDER_DPI),
            log_format: LogFormat::parse(&lookup("LOG_FORMAT").unwrap_or_default()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let env = self.environment.to_lowercase();
        let is_production = env == "production" || env == "prod";
        if is_production && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        if self.max_concurrent_conversions == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_CONVERSIONS must be greater than 0"
            ));
        }

        if self.conversion_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "CONVERSION_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if self.render_dpi == 0 {
            return Err(anyhow::anyhow!("RENDER_DPI must be greater than 0"));
        }

        Ok(())
    }
}
