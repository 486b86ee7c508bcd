//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap a service router with the ambient middleware (root span, request ID)
//! - Expose a liveness route
//! - Bind server to listener and drain on shutdown

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::observability::{RecordStatus, RequestSpan};

/// HTTP server for one of the two services.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around `routes`, which must already carry their state.
    pub fn new(routes: Router, config: &ServiceConfig) -> Self {
        Self {
            router: Self::build_router(routes, config),
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(routes: Router, config: &ServiceConfig) -> Router {
        let traced = routes.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(RequestSpan::new(config.request_name.as_str()))
                        .on_response(RecordStatus),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

        Router::new()
            .route("/health", get(|| async { "ok" }))
            .merge(traced)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Consume the server, returning the fully layered router.
    pub fn into_router(self) -> Router {
        self.router
    }
}
