//! Logging initialisation and request logging.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use backbone_config::ServiceConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `LOG_LEVEL` is unset or invalid.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Builds the log filter from a `LOG_LEVEL` value.
///
/// Accepts anything an `EnvFilter` directive accepts, e.g. `debug` or
/// `info,backbone_cache=trace`.
pub fn log_filter(level: Option<&str>) -> EnvFilter {
    level
        .filter(|level| !level.trim().is_empty())
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Installs the global tracing subscriber.
///
/// Production services log JSON lines, other environments compact
/// human-readable lines. Calling it twice is a no-op.
pub fn init_logging(config: &ServiceConfig) {
    let filter = log_filter(std::env::var("LOG_LEVEL").ok().as_deref());
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.is_production() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(
            service = %config.name,
            environment = %config.environment,
            "Logging initialized"
        );
    }
}

/// Logs every request with its matched route, status and latency.
///
/// ```ignore
/// let app = Router::new()
///     .route("/posts", get(list_posts))
///     .layer(axum::middleware::from_fn(logging_middleware));
/// ```
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %matched_path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}
