//! # API Module
//!
//! HTTP status surface of the relayer: liveness, readiness and metrics.

pub mod routes;
