//! Routing shared by the inspector and the deliverer.
//!
//! Both stages derive the route from the raw batch bytes independently, so the
//! only thing crossing the channel between them is the batch itself.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    domain::ChainRegistry,
    metrics::BATCHES_DISCARDED,
    models::{
        BatchVaa, ChainDefinition, ChainId, DeliveryIndex, DeliveryInstructions,
        DeliveryLocation, VaaError,
    },
    services::{ChainGateway, GatewayError},
};

/// Why a batch is not relayed.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Undecodable batch: {0}")]
    Undecodable(#[from] VaaError),
    #[error("Batch from unregistered source chain: {0}")]
    UnknownSourceChain(ChainId),
    #[error("No observation emitted by relay contract {0}")]
    NoDeliveryObservation(Address),
    #[error("Observations {indices:?} were all emitted by relay contract {contract}")]
    AmbiguousDeliveryObservation {
        contract: Address,
        indices: Vec<DeliveryIndex>,
    },
    #[error("Failed to decode delivery instructions on {chain}: {source}")]
    InstructionDecode {
        chain: ChainId,
        #[source]
        source: GatewayError,
    },
    #[error("Unexpected delivery payload id {0}")]
    UnexpectedPayload(u8),
    #[error("Delivery requested to unregistered chain: {0}")]
    UnknownTargetChain(ChainId),
}

impl RouteError {
    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            RouteError::Undecodable(_) => "undecodable",
            RouteError::UnknownSourceChain(_) => "unknown_source_chain",
            RouteError::NoDeliveryObservation(_) => "no_delivery_observation",
            RouteError::AmbiguousDeliveryObservation { .. } => "ambiguous_delivery_observation",
            RouteError::InstructionDecode { .. } => "instruction_decode_failed",
            RouteError::UnexpectedPayload(_) => "unexpected_payload",
            RouteError::UnknownTargetChain(_) => "unknown_target_chain",
        }
    }

    /// Failures of a chain RPC rather than batches this node does not serve.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(self, RouteError::InstructionDecode { .. })
    }
}

/// Delivery observation found in a batch, before any RPC.
#[derive(Debug, Clone)]
pub struct LocatedDelivery {
    pub source: ChainDefinition,
    pub delivery_index: DeliveryIndex,
    pub payload: Bytes,
}

#[derive(Debug, Clone)]
pub struct DeliveryRoute {
    pub source_chain: ChainId,
    pub delivery_index: DeliveryIndex,
    pub instructions: DeliveryInstructions,
    pub destination: ChainDefinition,
}

pub struct DeliveryRouter {
    registry: Arc<ChainRegistry>,
    gateway: Arc<dyn ChainGateway>,
}

impl DeliveryRouter {
    pub fn new(registry: Arc<ChainRegistry>, gateway: Arc<dyn ChainGateway>) -> Self {
        Self { registry, gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn ChainGateway> {
        &self.gateway
    }

    /// Decodes `raw` and finds the observation emitted by the source chain's relay contract.
    pub fn locate(&self, raw: &[u8]) -> Result<LocatedDelivery, RouteError> {
        let batch = BatchVaa::decode(raw)?;
        let source_chain = batch.source_chain().ok_or(VaaError::EmptyBatch)?;
        let source = self
            .registry
            .lookup(source_chain)
            .ok_or(RouteError::UnknownSourceChain(source_chain))?;

        let delivery_index = match DeliveryLocation::locate(&batch, &source.contract_address) {
            DeliveryLocation::Found(index) => index,
            DeliveryLocation::NotFound => {
                return Err(RouteError::NoDeliveryObservation(source.contract_address))
            }
            DeliveryLocation::Ambiguous(indices) => {
                return Err(RouteError::AmbiguousDeliveryObservation {
                    contract: source.contract_address,
                    indices,
                })
            }
        };

        let payload = batch
            .observations
            .into_iter()
            .nth(usize::from(delivery_index.0))
            .map(|indexed| Bytes::from(indexed.observation.payload))
            .ok_or(RouteError::NoDeliveryObservation(source.contract_address))?;

        Ok(LocatedDelivery {
            source: source.clone(),
            delivery_index,
            payload,
        })
    }

    /// Full route of `raw`: delivery observation, decoded instructions and destination.
    pub async fn route(&self, raw: &[u8]) -> Result<DeliveryRoute, RouteError> {
        let LocatedDelivery {
            source,
            delivery_index,
            payload,
        } = self.locate(raw)?;

        let instructions = self
            .gateway
            .decode_delivery_instructions(&source, payload)
            .await
            .map_err(|e| RouteError::InstructionDecode {
                chain: source.chain_id,
                source: e,
            })?;

        debug!(
            from_chain = %instructions.from_chain,
            from_address = %instructions.from_address,
            target_chain = %instructions.target_chain,
            target_address = %instructions.target_address,
            "decoded delivery instructions"
        );

        if !instructions.is_delivery() {
            return Err(RouteError::UnexpectedPayload(instructions.payload_id));
        }

        let destination = self
            .registry
            .lookup(instructions.target_chain)
            .ok_or(RouteError::UnknownTargetChain(instructions.target_chain))?
            .clone();

        Ok(DeliveryRoute {
            source_chain: source.chain_id,
            delivery_index,
            instructions,
            destination,
        })
    }
}

/// Records a discarded batch.
pub fn log_discard(stage: &str, err: &RouteError) {
    BATCHES_DISCARDED
        .with_label_values(&[stage, err.reason()])
        .inc();

    if err.is_upstream_failure() {
        error!(stage, error = %err, "discarding batch");
    } else {
        debug!(stage, reason = err.reason(), error = %err, "discarding batch");
    }
}
