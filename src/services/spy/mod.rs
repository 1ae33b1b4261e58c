//! Attestation source: the guardian spy's signed VAA stream.

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use http::uri::PathAndQuery;
use thiserror::Error;
use tonic::{
    codec::ProstCodec,
    transport::{Channel, Endpoint},
    Request,
};

#[cfg(test)]
use mockall::automock;

use crate::constants::SPY_SUBSCRIBE_SIGNED_VAA_PATH;

pub mod proto;
use proto::{SubscribeSignedVaaRequest, SubscribeSignedVaaResponse};

/// Raw signed batches in arrival order.
pub type VaaStream = BoxStream<'static, Result<Vec<u8>, SourceError>>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid spy endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("Failed to connect to spy: {0}")]
    Connect(#[from] tonic::transport::Error),
    #[error("Spy stream error: {0}")]
    Stream(#[from] tonic::Status),
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait AttestationSource: Send + Sync {
    /// Opens a new subscription covering every signed VAA.
    async fn subscribe(&self) -> Result<VaaStream, SourceError>;
}

/// gRPC client of the spy service.
#[derive(Debug, Clone)]
pub struct SpyClient {
    endpoint: Endpoint,
}

impl SpyClient {
    /// Accepts `host:port` or a full URI.
    pub fn new(addr: &str) -> Result<Self, SourceError> {
        let uri = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        };
        let endpoint =
            Endpoint::from_shared(uri.clone()).map_err(|e| SourceError::InvalidEndpoint {
                endpoint: uri,
                message: e.to_string(),
            })?;
        Ok(Self { endpoint })
    }

    pub fn uri(&self) -> &http::Uri {
        self.endpoint.uri()
    }
}

#[async_trait]
impl AttestationSource for SpyClient {
    async fn subscribe(&self) -> Result<VaaStream, SourceError> {
        let channel: Channel = self.endpoint.connect().await?;
        let mut grpc = tonic::client::Grpc::new(channel);
        grpc.ready().await?;

        let codec: ProstCodec<SubscribeSignedVaaRequest, SubscribeSignedVaaResponse> =
            ProstCodec::default();
        let path = PathAndQuery::from_static(SPY_SUBSCRIBE_SIGNED_VAA_PATH);
        let response = grpc
            .server_streaming(Request::new(SubscribeSignedVaaRequest::default()), path, codec)
            .await?;

        Ok(response
            .into_inner()
            .map(|item| item.map(|r| r.vaa_bytes).map_err(SourceError::from))
            .boxed())
    }
}
