//! EVM chain gateway backed by alloy HTTP providers.

use std::{future::Future, time::Duration};

use alloy::{
    network::EthereumWallet,
    primitives::{Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::client::{ClientBuilder, RpcClient},
    signers::local::PrivateKeySigner,
    transports::http::Http,
};
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::ClientBuilder as ReqwestClientBuilder;

use super::{ChainGateway, CoreRelayer, GatewayError};
use crate::{
    metrics::GATEWAY_REQUEST_SECONDS,
    models::{ChainDefinition, ChainId, DeliveryInstructions, TargetDeliveryParameters},
};

pub struct EvmChainGateway {
    /// Read-only providers, one per chain.
    providers: DashMap<ChainId, DynProvider>,
    timeout: Duration,
}

impl EvmChainGateway {
    /// Creates a gateway whose RPC calls are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: DashMap::new(),
            timeout,
        }
    }

    fn rpc_client(&self, chain: &ChainDefinition) -> Result<RpcClient, GatewayError> {
        // Using use_rustls_tls() forces the use of rustls instead of native-tls to support TLS 1.3
        let client = ReqwestClientBuilder::new()
            .connect_timeout(self.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| GatewayError::Connection {
                chain: chain.chain_id,
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        let transport = Http::with_client(client, chain.rpc_url.clone());
        let is_local = transport.guess_local();
        Ok(ClientBuilder::default().transport(transport, is_local))
    }

    fn read_provider(&self, chain: &ChainDefinition) -> Result<DynProvider, GatewayError> {
        if let Some(provider) = self.providers.get(&chain.chain_id) {
            return Ok(provider.clone());
        }

        let provider = ProviderBuilder::new()
            .connect_client(self.rpc_client(chain)?)
            .erased();
        self.providers.insert(chain.chain_id, provider.clone());
        Ok(provider)
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let timer = GATEWAY_REQUEST_SECONDS
            .with_label_values(&[operation])
            .start_timer();
        let result = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?;
        timer.observe_duration();
        result
    }
}

#[async_trait]
impl ChainGateway for EvmChainGateway {
    async fn decode_delivery_instructions(
        &self,
        chain: &ChainDefinition,
        payload: Bytes,
    ) -> Result<DeliveryInstructions, GatewayError> {
        let relayer = CoreRelayer::new(chain.contract_address, self.read_provider(chain)?);

        tracing::debug!(
            chain = %chain.chain_id,
            contract = %chain.contract_address,
            "decoding delivery instructions"
        );

        let instructions = self
            .with_timeout("decode_delivery_instructions", async {
                relayer
                    .decodeDeliveryInstructions(payload)
                    .call()
                    .await
                    .map_err(|e| GatewayError::ContractCall(e.to_string()))
            })
            .await?;

        Ok(instructions.into())
    }

    async fn deliver(
        &self,
        chain: &ChainDefinition,
        params: TargetDeliveryParameters,
        signer: &PrivateKeySigner,
        value: U256,
    ) -> Result<TxHash, GatewayError> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_client(self.rpc_client(chain)?);
        let relayer = CoreRelayer::new(chain.contract_address, provider);

        self.with_timeout("deliver", async {
            let pending = relayer
                .deliver(params.into())
                .value(value)
                .send()
                .await
                .map_err(|e| GatewayError::Submission(e.to_string()))?;
            Ok(*pending.tx_hash())
        })
        .await
    }
}
