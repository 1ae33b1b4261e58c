use std::sync::Arc;

use alloy::primitives::{Bytes, TxHash, U256};
use async_trait::async_trait;
use eyre::eyre;
use thiserror::Error;
use tracing::{error, info};

use super::{log_discard, DeliveryRouter, RouteError, SharedReceiver, DELIVERER_STAGE};
use crate::{
    metrics::DELIVERIES,
    models::{ChainId, DeliveryIndex, TargetDeliveryParameters},
    services::{GatewayError, RelayerKey},
    supervisor::{Runnable, StageContext},
};

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("Delivery to {chain} failed: {source}")]
    Submission {
        chain: ChainId,
        #[source]
        source: GatewayError,
    },
}

/// A delivery accepted by the destination chain's node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedDelivery {
    pub destination: ChainId,
    pub delivery_index: DeliveryIndex,
    pub tx_hash: TxHash,
}

/// Submits approved batches to their destination chain.
pub struct Deliverer {
    router: Arc<DeliveryRouter>,
    to_deliver: SharedReceiver,
    key: RelayerKey,
    target_gas_limit: u32,
    native_payment: U256,
}

impl Deliverer {
    pub fn new(
        router: Arc<DeliveryRouter>,
        to_deliver: SharedReceiver,
        key: RelayerKey,
        target_gas_limit: u32,
        native_payment: U256,
    ) -> Self {
        Self {
            router,
            to_deliver,
            key,
            target_gas_limit,
            native_payment,
        }
    }

    /// Routes `raw` again and submits it to the destination relay contract.
    ///
    /// Failures are final; nothing is retried.
    pub async fn deliver(&self, raw: &[u8]) -> Result<SubmittedDelivery, DeliveryError> {
        let route = self.router.route(raw).await?;
        let destination = route.destination;

        let params = TargetDeliveryParameters {
            encoded_vm: Bytes::copy_from_slice(raw),
            delivery_index: route.delivery_index,
            target_call_gas_override: self.target_gas_limit,
        };
        let signer = self.key.signer_for(destination.network_id);

        let tx_hash = self
            .router
            .gateway()
            .deliver(&destination, params, &signer, self.native_payment)
            .await
            .map_err(|source| DeliveryError::Submission {
                chain: destination.chain_id,
                source,
            })?;

        Ok(SubmittedDelivery {
            destination: destination.chain_id,
            delivery_index: route.delivery_index,
            tx_hash,
        })
    }

    fn record(&self, outcome: Result<SubmittedDelivery, DeliveryError>) {
        match outcome {
            Ok(delivery) => {
                info!(
                    destination = %delivery.destination,
                    delivery_index = %delivery.delivery_index,
                    tx_hash = %delivery.tx_hash,
                    "successfully relayed batch"
                );
                DELIVERIES
                    .with_label_values(&[delivery.destination.to_string().as_str(), "success"])
                    .inc();
            }
            Err(DeliveryError::Route(e)) => log_discard(DELIVERER_STAGE, &e),
            Err(DeliveryError::Submission { chain, source }) => {
                error!(destination = %chain, error = %source, "failed delivering to destination");
                DELIVERIES
                    .with_label_values(&[chain.to_string().as_str(), "failed"])
                    .inc();
            }
        }
    }
}

#[async_trait]
impl Runnable for Deliverer {
    async fn run(&self, ctx: StageContext) -> eyre::Result<()> {
        let mut to_deliver = self.to_deliver.lock().await;
        ctx.signal_healthy();

        loop {
            let raw = tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                raw = to_deliver.recv() => raw.ok_or_else(|| eyre!("delivery queue closed"))?,
            };

            let outcome = tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                outcome = self.deliver(&raw) => outcome,
            };
            self.record(outcome);
        }
    }
}
