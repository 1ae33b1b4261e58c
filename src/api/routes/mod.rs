//! # API Routes Module
//!
//! ## Routes
//!
//! * `/health` - Liveness
//! * `/readyz` - Readiness of the pipeline components
//! * `/metrics` - Prometheus exposition

pub mod health;
pub mod metrics;

use actix_web::web;
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::init).configure(metrics::init);
}
