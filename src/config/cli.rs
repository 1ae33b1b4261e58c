use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::constants::{
    DEFAULT_LOG_LEVEL, DEFAULT_OBSERVATION_QUEUE_CAPACITY, DEFAULT_RPC_TIMEOUT_SECS,
    TARGET_GAS_LIMIT,
};

/// Relays batched delivery requests between chains.
#[derive(Parser, Debug, Clone)]
#[command(name = "offchain-relayer", version)]
pub struct RelayArgs {
    /// Listen address for the health, readiness and metrics server (disabled if blank)
    #[arg(long, env = "RELAY_STATUS_ADDR", default_value = "")]
    pub status_addr: String,

    /// Data directory
    #[arg(long, env = "RELAY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to a file holding the hex-encoded sender key
    #[arg(long, env = "RELAY_SENDER_KEY_PATH")]
    pub sender_key_path: Option<PathBuf>,

    /// Hex-encoded sender key
    #[arg(long, env = "RELAY_SENDER_KEY_HEX", hide_env_values = true)]
    pub sender_key_hex: Option<String>,

    /// RPC URL of the first EVM chain
    #[arg(long, env = "RELAY_EVM_RPC")]
    pub evm_rpc: Option<String>,

    /// Relay contract address on the first EVM chain
    #[arg(long, env = "RELAY_EVM_CONTRACT")]
    pub evm_contract: Option<String>,

    /// Wormhole chain id of the first EVM chain
    #[arg(long, env = "RELAY_EVM_WORMHOLE_CHAIN_ID")]
    pub evm_wormhole_chain_id: Option<u16>,

    /// EVM network id of the first EVM chain
    #[arg(long, env = "RELAY_EVM_NETWORK_ID")]
    pub evm_network_id: Option<String>,

    /// RPC URL of the second EVM chain
    #[arg(long, env = "RELAY_EVM2_RPC")]
    pub evm2_rpc: Option<String>,

    /// Relay contract address on the second EVM chain
    #[arg(long, env = "RELAY_EVM2_CONTRACT")]
    pub evm2_contract: Option<String>,

    /// Wormhole chain id of the second EVM chain
    #[arg(long, env = "RELAY_EVM2_WORMHOLE_CHAIN_ID")]
    pub evm2_wormhole_chain_id: Option<u16>,

    /// EVM network id of the second EVM chain
    #[arg(long, env = "RELAY_EVM2_NETWORK_ID")]
    pub evm2_network_id: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, env = "RELAY_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Launch in unsafe development mode (only use this for devnet!)
    #[arg(long, env = "RELAY_UNSAFE_DEV_MODE")]
    pub unsafe_dev_mode: bool,

    /// Launch in testnet mode
    #[arg(long, env = "RELAY_TESTNET_MODE")]
    pub testnet_mode: bool,

    /// Node name to announce in logs
    #[arg(long, env = "RELAY_NODE_NAME")]
    pub node_name: Option<String>,

    /// Address of the spy gRPC service
    #[arg(long, env = "RELAY_SPY_RPC")]
    pub spy_rpc: Option<String>,

    /// Address of the guardian gRPC service
    #[arg(long, env = "RELAY_GUARDIAN_RPC")]
    pub guardian_rpc: Option<String>,

    /// JSON file with additional chain definitions
    #[arg(long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gas limit forwarded to the target contract call
    #[arg(long, env = "RELAY_TARGET_GAS_LIMIT", default_value_t = TARGET_GAS_LIMIT)]
    pub target_gas_limit: u32,

    /// Capacity of the queue between the watcher and the inspector
    #[arg(long, env = "RELAY_OBSERVATION_QUEUE_CAPACITY", default_value_t = DEFAULT_OBSERVATION_QUEUE_CAPACITY)]
    pub observation_queue_capacity: usize,

    /// Timeout of each chain RPC request in seconds
    #[arg(long, env = "RELAY_RPC_TIMEOUT_SECS", default_value_t = DEFAULT_RPC_TIMEOUT_SECS)]
    pub rpc_timeout_secs: u64,

    /// Exit when a pipeline stage panics instead of restarting it
    #[arg(long, env = "RELAY_PROPAGATE_PANICS", default_value_t = true, action = ArgAction::Set)]
    pub propagate_panics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    fn test_command_is_well_formed() {
        RelayArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = RelayArgs::try_parse_from(["offchain-relayer"]).unwrap();
        assert!(args.status_addr.is_empty());
        assert_eq!(args.log_level, "info");
        assert_eq!(args.target_gas_limit, 500_000);
        assert_eq!(args.observation_queue_capacity, 50);
        assert_eq!(args.rpc_timeout_secs, 30);
        assert!(args.propagate_panics);
        assert!(!args.unsafe_dev_mode);
    }

    #[test]
    fn test_propagate_panics_can_be_disabled() {
        let args =
            RelayArgs::try_parse_from(["offchain-relayer", "--propagate-panics", "false"]).unwrap();
        assert!(!args.propagate_panics);
    }

    #[test]
    #[serial]
    fn test_flags_fall_back_to_environment() {
        std::env::set_var("RELAY_GUARDIAN_RPC", "guardian:7070");
        let args = RelayArgs::try_parse_from(["offchain-relayer"]);
        std::env::remove_var("RELAY_GUARDIAN_RPC");

        assert_eq!(args.unwrap().guardian_rpc.as_deref(), Some("guardian:7070"));
    }

    #[test]
    #[serial]
    fn test_flag_overrides_environment() {
        std::env::set_var("RELAY_GUARDIAN_RPC", "guardian:7070");
        let args =
            RelayArgs::try_parse_from(["offchain-relayer", "--guardian-rpc", "other:7070"]);
        std::env::remove_var("RELAY_GUARDIAN_RPC");

        assert_eq!(args.unwrap().guardian_rpc.as_deref(), Some("other:7070"));
    }
}
