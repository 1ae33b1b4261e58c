//! Default constants for the batch delivery pipeline.

// === Delivery Defaults ===
/// Gas override handed to the destination contract for the target call
pub const TARGET_GAS_LIMIT: u32 = 500_000;

/// Payload id the relay contract uses for delivery instructions
pub const DELIVERY_PAYLOAD_ID: u8 = 1;

/// Only batch VAAs (version 2) carry multiple observations
pub const BATCH_VAA_VERSION: u8 = 2;

// === Channel Defaults ===
/// Capacity of the channel between the spy watcher and the inspector
pub const DEFAULT_OBSERVATION_QUEUE_CAPACITY: usize = 50;

/// Capacity of the channel between the inspector and the deliverer.
/// Tokio channels need at least one slot, so this is the closest to a rendezvous handoff.
pub const DELIVERY_QUEUE_CAPACITY: usize = 1;

// === RPC Defaults ===
/// Timeout applied to every chain gateway request
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// gRPC method streaming signed VAAs out of the guardian spy
pub const SPY_SUBSCRIBE_SIGNED_VAA_PATH: &str = "/spy.v1.SpyRPCService/SubscribeSignedVAA";

// === Readiness ===
/// Readiness component flipped once the spy subscription is established
pub const SPY_READINESS_COMPONENT: &str = "spyReadiness";

// === Development ===
/// Deterministic devnet account #2, only ever used with `--unsafe-dev-mode`
pub const DEVNET_SENDER_KEY_HEX: &str =
    "6370fd033278c143179d81c5526140625662b8daa446c22ee2d73db3707e620c";

/// Chains a relayer must serve: one source and at least one destination.
pub const MIN_CONFIGURED_CHAINS: usize = 2;
