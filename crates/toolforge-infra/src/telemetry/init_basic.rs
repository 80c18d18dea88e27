use toolforge_core::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "toolforge=debug,tower_http=debug";

/// Initialize tracing with the configured output format
pub fn init_telemetry(
    format: LogFormat,
    service_name: &str,
    service_version: &str,
    environment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (text_layer, json_layer) = match format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json().with_current_span(true))),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    tracing::info!(
        service = service_name,
        version = service_version,
        environment = environment,
        log_format = ?format,
        "Tracing initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
