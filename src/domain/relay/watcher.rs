use std::sync::Arc;

use async_trait::async_trait;
use eyre::eyre;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    constants::SPY_READINESS_COMPONENT,
    metrics::BATCHES_OBSERVED,
    services::{AttestationSource, ReadinessTracker, VaaStream},
    supervisor::{Runnable, StageContext},
};

/// Reports the spy as not ready when dropped, including while unwinding.
struct SubscriptionReadiness<'a> {
    readiness: &'a ReadinessTracker,
}

impl<'a> SubscriptionReadiness<'a> {
    fn ready(readiness: &'a ReadinessTracker) -> Self {
        readiness.set_ready(SPY_READINESS_COMPONENT);
        Self { readiness }
    }
}

impl Drop for SubscriptionReadiness<'_> {
    fn drop(&mut self) {
        self.readiness.set_not_ready(SPY_READINESS_COMPONENT);
    }
}

/// Subscribes to the spy and feeds every signed batch into the observation queue.
pub struct Watcher {
    source: Arc<dyn AttestationSource>,
    observations: mpsc::Sender<Vec<u8>>,
    readiness: Arc<ReadinessTracker>,
}

impl Watcher {
    pub fn new(
        source: Arc<dyn AttestationSource>,
        observations: mpsc::Sender<Vec<u8>>,
        readiness: Arc<ReadinessTracker>,
    ) -> Self {
        Self {
            source,
            observations,
            readiness,
        }
    }

    async fn forward(&self, ctx: &StageContext, stream: &mut VaaStream) -> eyre::Result<()> {
        loop {
            let item = tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                item = stream.next() => item,
            };

            let raw = match item {
                Some(Ok(raw)) => raw,
                Some(Err(e)) => return Err(e.into()),
                None => {
                    warn!("spy stream ended");
                    return Ok(());
                }
            };

            BATCHES_OBSERVED.inc();
            debug!(len = raw.len(), "received signed batch");

            // Blocks while the inspector is behind.
            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                sent = self.observations.send(raw) => {
                    sent.map_err(|_| eyre!("observation queue closed"))?
                }
            }
        }
    }
}

#[async_trait]
impl Runnable for Watcher {
    async fn run(&self, ctx: StageContext) -> eyre::Result<()> {
        let mut stream = tokio::select! {
            _ = ctx.cancelled() => return Ok(()),
            subscribed = self.source.subscribe() => subscribed?,
        };

        info!("subscribed to signed VAA stream");
        let _ready = SubscriptionReadiness::ready(&self.readiness);
        ctx.signal_healthy();

        self.forward(&ctx, &mut stream).await
    }
}

#[cfg(test)]
mod tests {
    use std::task::Poll;

    use futures::stream;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{
        domain::relay::WATCHER_STAGE,
        services::{MockAttestationSource, SourceError},
    };

    fn watcher(source: MockAttestationSource) -> (Arc<Watcher>, Arc<ReadinessTracker>) {
        let readiness = Arc::new(ReadinessTracker::new());
        readiness.register(SPY_READINESS_COMPONENT);
        let (observations, _) = mpsc::channel(1);
        let watcher = Watcher::new(Arc::new(source), observations, readiness.clone());
        (Arc::new(watcher), readiness)
    }

    #[tokio::test]
    async fn test_readiness_cleared_when_stream_panics() {
        let mut source = MockAttestationSource::new();
        source.expect_subscribe().times(1).returning(|| {
            let exploding = stream::poll_fn(|_| -> Poll<Option<Result<Vec<u8>, SourceError>>> {
                panic!("spy stream exploded")
            });
            Box::pin(async move { Ok(exploding.boxed()) })
        });
        let (watcher, readiness) = watcher(source);

        let run = tokio::spawn(async move {
            watcher
                .run(StageContext::new(WATCHER_STAGE, CancellationToken::new()))
                .await
        });

        let err = run.await.unwrap_err();
        assert!(err.is_panic());
        assert!(!readiness.is_ready());
        assert_eq!(readiness.pending(), vec![SPY_READINESS_COMPONENT.to_string()]);
    }

    #[tokio::test]
    async fn test_readiness_follows_subscription() {
        let mut source = MockAttestationSource::new();
        source
            .expect_subscribe()
            .times(1)
            .returning(|| Box::pin(async { Ok(stream::pending().boxed()) }));
        let (watcher, readiness) = watcher(source);
        let cancel = CancellationToken::new();

        let ctx = StageContext::new(WATCHER_STAGE, cancel.clone());
        let run = tokio::spawn({
            let watcher = watcher.clone();
            async move { watcher.run(ctx).await }
        });

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while !readiness.is_ready() {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("watcher never became ready");

        cancel.cancel();
        assert!(run.await.unwrap().is_ok());
        assert!(!readiness.is_ready());
    }
}
