//! Pipeline initialization
//!
//! Builds the chain gateway, spy client and delivery router from the validated
//! configuration and spawns the three stages under a supervisor.
use crate::{
    config::RelayConfig,
    domain::{DeliveryRouter, RelayPipeline},
    services::{EvmChainGateway, ReadinessTracker, RelayerKey, SpyClient},
    supervisor::Supervisor,
};
use color_eyre::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Starts the relay pipeline.
///
/// # Returns
///
/// * `Result<Supervisor>` - Supervisor owning the running stages; await
///   [`Supervisor::wait`] to observe their termination
///
/// # Errors
///
/// Returns error if the spy endpoint is not a valid URI.
pub fn initialize_pipeline(
    config: &RelayConfig,
    key: RelayerKey,
    readiness: Arc<ReadinessTracker>,
    cancel: CancellationToken,
) -> Result<Supervisor> {
    let registry = Arc::new(config.registry.clone());
    let gateway = Arc::new(EvmChainGateway::new(config.rpc_timeout));
    let router = Arc::new(DeliveryRouter::new(registry, gateway));
    let source = Arc::new(SpyClient::new(&config.spy_rpc)?);

    info!(
        spy = %source.uri(),
        chains = config.registry.len(),
        sender = %key.address(),
        "starting relay pipeline"
    );

    let pipeline = RelayPipeline::new(&config.pipeline, router, source, key, readiness);
    let mut supervisor = Supervisor::new(cancel, config.supervisor.clone());
    pipeline.spawn(&mut supervisor);

    Ok(supervisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RelayArgs, constants::SPY_READINESS_COMPONENT};
    use clap::Parser;

    fn dev_config(spy_rpc: &str) -> RelayConfig {
        let args = RelayArgs::try_parse_from([
            "offchain-relayer",
            "--unsafe-dev-mode",
            "--spy-rpc",
            spy_rpc,
            "--guardian-rpc",
            "127.0.0.1:1",
            "--evm-rpc",
            "http://127.0.0.1:1",
            "--evm-contract",
            "0x1111111111111111111111111111111111111111",
            "--evm-wormhole-chain-id",
            "2",
            "--evm-network-id",
            "1337",
            "--evm2-rpc",
            "http://127.0.0.1:1",
            "--evm2-contract",
            "0x2222222222222222222222222222222222222222",
            "--evm2-wormhole-chain-id",
            "4",
            "--evm2-network-id",
            "1397",
        ])
        .unwrap();
        RelayConfig::from_args_for_build(args, None).unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_stops_on_cancellation() {
        let config = dev_config("127.0.0.1:1");
        let key = RelayerKey::load(&config.key_source).unwrap();
        let readiness = Arc::new(ReadinessTracker::new());
        let cancel = CancellationToken::new();

        let supervisor =
            initialize_pipeline(&config, key, readiness.clone(), cancel.clone()).unwrap();
        assert_eq!(readiness.pending(), vec![SPY_READINESS_COMPONENT.to_string()]);

        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), supervisor.wait())
            .await
            .expect("pipeline did not stop");
        assert!(result.is_ok());
        assert!(!readiness.is_ready());
    }

    #[tokio::test]
    async fn test_invalid_spy_endpoint() {
        let config = dev_config("http://[::1");
        let key = RelayerKey::load(&config.key_source).unwrap();

        let result = initialize_pipeline(
            &config,
            key,
            Arc::new(ReadinessTracker::new()),
            CancellationToken::new(),
        );
        assert!(result.is_err());
    }
}
