//! Status server initialization
use crate::{
    api::routes::configure_routes,
    constants::{STATUS_SERVER_SHUTDOWN_TIMEOUT_SECONDS, STATUS_SERVER_WORKERS},
    services::ReadinessTracker,
};
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use color_eyre::{eyre::WrapErr, Result};
use std::sync::Arc;
use tracing::info;

/// Binds the health, readiness and metrics server on `addr`.
///
/// The returned server is not polled yet. Signal handling is left to the caller
/// so that shutdown is driven by the same cancellation as the pipeline.
///
/// # Errors
///
/// Returns error if the address cannot be bound.
pub fn initialize_status_server(addr: &str, readiness: Arc<ReadinessTracker>) -> Result<Server> {
    let readiness = web::Data::from(readiness);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(readiness.clone())
            .configure(configure_routes)
    })
    .workers(STATUS_SERVER_WORKERS)
    .disable_signals()
    .shutdown_timeout(STATUS_SERVER_SHUTDOWN_TIMEOUT_SECONDS)
    .bind(addr)
    .wrap_err_with(|| format!("failed to bind status server on {addr}"))?;

    for bound in server.addrs() {
        info!(addr = %bound, "status server listening");
    }

    Ok(server.run())
}
