//! This module provides health check and readiness endpoints.
//!
//! The `/health` endpoint verifies that the process is running and responsive.
//! The `/readyz` endpoint reports whether every registered pipeline component
//! is ready, e.g. the spy subscription is established.
use actix_web::{get, web, HttpResponse};

use crate::services::ReadinessTracker;

/// Handles the `/health` endpoint.
///
/// Returns an `HttpResponse` with a status of `200 OK` and a body of `"OK"`.
#[get("/health")]
async fn health() -> Result<HttpResponse, actix_web::Error> {
    Ok(HttpResponse::Ok().body("OK"))
}

/// Returns 200 OK when all components are ready, 503 Service Unavailable with
/// the pending component names otherwise.
#[get("/readyz")]
async fn readiness(tracker: web::Data<ReadinessTracker>) -> Result<HttpResponse, actix_web::Error> {
    let report = tracker.report();
    if report.ready {
        Ok(HttpResponse::Ok().json(report))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(report))
    }
}

/// Initializes the health check and readiness routes.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
    cfg.service(readiness);
}
