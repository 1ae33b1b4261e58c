//! Messages of the spy's `SubscribeSignedVAA` call.

#[derive(Clone, PartialEq, prost::Message)]
pub struct EmitterFilter {
    #[prost(int32, tag = "1")]
    pub chain_id: i32,
    #[prost(string, tag = "2")]
    pub emitter_address: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FilterEntry {
    #[prost(message, optional, tag = "1")]
    pub emitter_filter: Option<EmitterFilter>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SubscribeSignedVaaRequest {
    /// Empty means every signed VAA.
    #[prost(message, repeated, tag = "1")]
    pub filters: Vec<FilterEntry>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SubscribeSignedVaaResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub vaa_bytes: Vec<u8>,
}
