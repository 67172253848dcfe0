//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router that sends every request to the redirect handler
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Install rebuilt handlers as they arrive (hot reload)
//! - Stop on the shutdown signal, letting in-flight requests finish

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::routing::RedirectHandler;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Currently installed handler. Each request loads one snapshot and keeps
    /// it until the response is produced.
    pub handler: Arc<ArcSwap<RedirectHandler>>,
}

/// HTTP server for the redirect service.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving `handler`.
    pub fn new(config: &ServerConfig, handler: RedirectHandler) -> Self {
        let state = AppState {
            handler: Arc::new(ArcSwap::from_pointee(handler)),
        };

        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(redirect_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Replace the installed handler. Requests already running keep the old one.
    pub fn install(&self, handler: RedirectHandler) {
        install(&self.state, handler);
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Handlers received on `updates` replace the installed one; the server
    /// stops when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut updates: mpsc::UnboundedReceiver<RedirectHandler>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            entries = self.state.handler.load().resolver().table().len(),
            "HTTP server starting"
        );

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(handler) = updates.recv().await {
                install(&state, handler);
            }
        });

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn install(state: &AppState, handler: RedirectHandler) {
    let entries = handler.resolver().table().len();
    state.handler.store(Arc::new(handler));
    tracing::info!(entries, "Redirect handler installed");
}

/// Resolve the request path against the installed handler.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let handler = state.handler.load_full();
    handler.respond(request).await
}
