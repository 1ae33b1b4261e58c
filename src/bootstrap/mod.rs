//! Initialization routines for the relayer process
//!
//! # Submodules
//!
//! - `initialize_pipeline`: Wires the gateway, spy client, router and stages into a supervisor
//! - `initialize_status_server`: Builds the health, readiness and metrics HTTP server
mod initialize_pipeline;
pub use initialize_pipeline::*;

mod initialize_status_server;
pub use initialize_status_server::*;
