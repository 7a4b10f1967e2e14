//! HTTP boundary: accepts multipart uploads and returns the extraction
//! result in a `{success, data | error}` envelope.
//!
//! | Route | Method | Handler |
//! |-------|--------|---------|
//! | `/` | GET | service status |
//! | `/parse-pdf` | POST | run the pipeline on the `file` part |
//! | `/parse-pdf` | OPTIONS | empty 200 |
//! | anything else | any | 404 envelope |

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiFailure, ApiSuccess};

use crate::backend::PdfBackend;
use crate::config::ExtractionConfig;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Room left above the document ceiling for multipart framing.
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Listener and CORS settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn PdfBackend>,
    pub config: Arc<ExtractionConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn PdfBackend>, config: ExtractionConfig) -> Self {
        Self {
            backend,
            config: Arc::new(config),
        }
    }
}

/// Build the router with CORS, body limit and request tracing applied.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let body_limit = state.config.max_file_size.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/parse-pdf",
            post(handlers::parse_pdf).options(handlers::preflight),
        )
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, server: ServerConfig) -> std::io::Result<()> {
    let limit_mb = state.config.max_file_size_mb();
    let extensions = state.config.allowed_extensions_display();
    let app = router(state, &server);

    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    let addr = listener.local_addr()?;

    info!("PDF parser service listening on http://{}", addr);
    info!("Endpoints: GET /, POST /parse-pdf");
    info!("Max upload: {}MB, allowed extensions: {}", limit_mb, extensions);
    info!("CORS origins: {}", server.cors_origins.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:5001");
        assert_eq!(config.cors_origins.len(), 2);
    }
}
