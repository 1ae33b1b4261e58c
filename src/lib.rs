//! Off-chain relayer for batched cross-chain delivery requests.
//!
//! The relayer subscribes to signed batch VAAs from a spy node, keeps the ones
//! that carry a delivery request emitted by a registered relay contract and
//! submits them to the destination chain's relay contract.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod supervisor;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
