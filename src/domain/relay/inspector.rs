use std::sync::Arc;

use async_trait::async_trait;
use eyre::eyre;
use tokio::sync::mpsc;
use tracing::info;

use super::{log_discard, DeliveryRouter, SharedReceiver, INSPECTOR_STAGE};
use crate::{
    metrics::BATCHES_FORWARDED,
    supervisor::{Runnable, StageContext},
};

/// Filters observed batches down to deliveries this node can perform.
pub struct Inspector {
    router: Arc<DeliveryRouter>,
    observations: SharedReceiver,
    to_deliver: mpsc::Sender<Vec<u8>>,
}

impl Inspector {
    pub fn new(
        router: Arc<DeliveryRouter>,
        observations: SharedReceiver,
        to_deliver: mpsc::Sender<Vec<u8>>,
    ) -> Self {
        Self {
            router,
            observations,
            to_deliver,
        }
    }
}

#[async_trait]
impl Runnable for Inspector {
    async fn run(&self, ctx: StageContext) -> eyre::Result<()> {
        let mut observations = self.observations.lock().await;
        ctx.signal_healthy();

        loop {
            let raw = tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                raw = observations.recv() => raw.ok_or_else(|| eyre!("observation queue closed"))?,
            };

            let routed = tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                routed = self.router.route(&raw) => routed,
            };

            let route = match routed {
                Ok(route) => route,
                Err(e) => {
                    log_discard(INSPECTOR_STAGE, &e);
                    continue;
                }
            };

            info!(
                source_chain = %route.source_chain,
                target_chain = %route.destination.chain_id,
                delivery_index = %route.delivery_index,
                "batch approved for delivery"
            );

            // Blocks until the deliverer takes the batch.
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                sent = self.to_deliver.send(raw) => {
                    sent.map_err(|_| eyre!("delivery queue closed"))?
                }
            }
            BATCHES_FORWARDED.inc();
        }
    }
}
