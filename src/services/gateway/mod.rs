//! Chain gateway: the RPC surface of a chain's relay contract.
//!
//! The pipeline only needs two operations: decoding delivery instructions on the
//! source chain and submitting a delivery on the destination chain.

use std::time::Duration;

use alloy::{
    primitives::{Bytes, TxHash, U256},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{ChainDefinition, ChainId, DeliveryInstructions, TargetDeliveryParameters};

mod contract;
pub use contract::*;

mod evm;
pub use evm::*;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to connect to {chain}: {message}")]
    Connection { chain: ChainId, message: String },
    #[error("Contract call failed: {0}")]
    ContractCall(String),
    #[error("Transaction submission failed: {0}")]
    Submission(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait ChainGateway: Send + Sync {
    /// Asks `chain`'s relay contract to decode the payload of a delivery observation.
    async fn decode_delivery_instructions(
        &self,
        chain: &ChainDefinition,
        payload: Bytes,
    ) -> Result<DeliveryInstructions, GatewayError>;

    /// Submits a delivery to `chain`'s relay contract, signed by `signer`.
    ///
    /// Returns once the transaction is accepted by the node, without waiting for
    /// inclusion.
    async fn deliver(
        &self,
        chain: &ChainDefinition,
        params: TargetDeliveryParameters,
        signer: &PrivateKeySigner,
        value: U256,
    ) -> Result<TxHash, GatewayError>;
}
