//! Startup orchestration.
//!
//! # Responsibilities
//! - Bring up the trace pipeline before anything else
//! - Build the service state for the chosen role
//! - Bind the listener and serve until a signal arrives
//! - Flush spans on the way out
//!
//! # Design Decisions
//! - Fail fast: a collector that cannot be reached aborts startup
//! - Listener binds last (traffic only when tracing is ready)

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{ServiceConfig, ServiceRole};
use crate::error::StartupError;
use crate::http::{HttpServer, TracedClient};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{init_logging, init_tracer_provider};
use crate::{back, front};

/// Service routes for `role`, with real upstream clients.
pub fn service_routes(role: ServiceRole, config: &ServiceConfig) -> Result<Router, StartupError> {
    let client = TracedClient::new()?;
    Ok(match role {
        ServiceRole::Front => front::routes(front::state_from_config(config, client)),
        ServiceRole::Back => back::routes(back::state_from_config(config, client)),
    })
}

/// Run one service until SIGINT/SIGTERM.
pub async fn run(role: ServiceRole, config: ServiceConfig) -> Result<(), StartupError> {
    let (tracer, mut telemetry) = match init_tracer_provider(&config.telemetry, &config.service_name).await {
        Ok(pair) => pair,
        Err(e) => {
            init_logging(&config.telemetry.log_level, None);
            tracing::error!(error = %e, "Refusing to start without a trace pipeline");
            return Err(e.into());
        }
    };
    init_logging(&config.telemetry.log_level, Some(tracer));
    tracing::info!(
        endpoint = %config.telemetry.endpoint(),
        protocol = ?config.telemetry.protocol,
        "Trace exporter connected"
    );

    tracing::info!(
        role = %role,
        service_name = %config.service_name,
        request_name = %config.request_name,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );

    let routes = service_routes(role, &config)?;
    let server = HttpServer::new(routes, &config);

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        }
    });

    let served = server.run(listener, server_shutdown).await;

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    served.map_err(StartupError::Serve)
}
