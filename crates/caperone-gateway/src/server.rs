// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Assembles the API routes, the uploads mount and the static site into one
//! router, and runs it until the shutdown token is cancelled.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use caperone_core::{AssetStore, CaperoneError, ContactStore, Notifier, UPLOADS_MOUNT};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactStore>,
    pub assets: Arc<dyn AssetStore>,
    /// Chosen once at startup; a disabled notifier when SMTP is not configured.
    pub notifier: Arc<dyn Notifier>,
}

/// Server configuration (mirrors the `[server]` and `[storage]` settings
/// the gateway needs, without depending on the config crate).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Directory of the static site served for unmatched GET requests.
    pub public_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

/// Build the application router.
///
/// Routes:
/// - GET /api/health
/// - POST /api/contact
/// - POST /api/quote
/// - POST /api/upload
/// - GET /uploads/{name}
/// - everything else: files under `public_dir`, then `public_dir/index.html`
///   if it exists, else a plain 404
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    let api = Router::new()
        .route("/api/health", get(handlers::get_health))
        .route("/api/contact", post(handlers::post_contact))
        .route("/api/quote", post(handlers::post_quote))
        .route("/api/upload", post(handlers::post_upload))
        .route(&format!("{UPLOADS_MOUNT}/{{name}}"), get(handlers::get_upload))
        .with_state(state);

    let site = ServeDir::new(&config.public_dir);
    let index = config.public_dir.join("index.html");
    let app = if index.is_file() {
        api.fallback_service(site.fallback(ServeFile::new(index)))
    } else {
        tracing::debug!(
            public_dir = %config.public_dir.display(),
            "no index.html, unmatched paths return 404"
        );
        api.fallback_service(site.fallback(handlers::not_found.into_service()))
    };

    app.layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind the configured address.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, CaperoneError> {
    let addr = format!("{}:{}", config.host, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| CaperoneError::Server {
            message: format!("failed to bind {addr}: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Serve `router` on `listener` until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), CaperoneError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "caperone listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| CaperoneError::Server {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

/// Bind, build the router and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), CaperoneError> {
    let listener = bind(config).await?;
    serve(listener, build_router(config, state), shutdown).await
}
