//! # Domain Module
//!
//! Core relay logic:
//!
//! * Chain registry shared by every stage
//! * Delivery routing
//! * Watcher, inspector and deliverer stages

mod chain_registry;
pub use chain_registry::*;

pub mod relay;
pub use relay::*;
