//! Prometheus scrape endpoint.
//!
//! `GET /metrics` refreshes the system gauges and returns the whole registry in
//! the text exposition format.

use crate::metrics::{gather_metrics, update_system_metrics};
use actix_web::{get, web, HttpResponse, Responder};

#[get("/metrics")]
async fn scrape_metrics() -> impl Responder {
    update_system_metrics();
    match gather_metrics() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().body(format!("Error: {}", e)),
    }
}

/// Initializes the HTTP services for the metrics module.
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(scrape_metrics);
}
