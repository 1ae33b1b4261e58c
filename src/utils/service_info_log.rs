//! Startup banner.
use std::env;
use tracing::{info, warn};

use crate::config::RelayConfig;

/// Logs service and node information at startup. Never logs key material.
pub fn log_service_info(config: &RelayConfig) {
    let service_name = env!("CARGO_PKG_NAME");
    let service_version = env!("CARGO_PKG_VERSION");

    info!("=== Offchain Relayer Service Starting ===");
    info!(service_name = %service_name, service_version = %service_version, "🚀 service");
    info!(rust_version = %env!("CARGO_PKG_RUST_VERSION"), "🦀 rust version");

    info!(platform = %env::consts::OS, "💻 platform");
    info!(architecture = %env::consts::ARCH, "💻 architecture");

    info!(node_name = %config.node_name, "🏷️ node name");
    if let Some(data_dir) = &config.data_dir {
        info!(data_dir = %data_dir.display(), "📁 data directory");
    }

    info!(spy_rpc = %config.spy_rpc, "🔭 spy endpoint");
    info!(guardian_rpc = %config.guardian_rpc, "🔭 guardian endpoint");

    for chain in config.registry.iter() {
        info!(
            chain = %chain.chain_id,
            network_id = chain.network_id,
            rpc_url = %chain.rpc_url,
            contract = %chain.contract_address,
            "⛓️ chain"
        );
    }

    match &config.status_addr {
        Some(addr) => info!(status_addr = %addr, "🩺 status server"),
        None => info!("🩺 status server disabled"),
    }

    if config.testnet_mode {
        info!("🧪 testnet mode");
    }
    if config.unsafe_dev_mode {
        warn!("⚠️ unsafe development mode enabled, never use this outside a devnet");
    }

    info!(
        started_at = %chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        "🕒 started at"
    );
}
