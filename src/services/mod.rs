//! # Services Module
//!
//! External integrations: chain RPC, the guardian spy, signing keys and readiness.

pub mod gateway;
pub use gateway::*;

pub mod spy;
pub use spy::*;

pub mod signer;
pub use signer::*;

pub mod health;
pub use health::*;
