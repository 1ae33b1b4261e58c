use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy::primitives::{Address, U256};
use reqwest::Url;
use sysinfo::System;
use zeroize::Zeroizing;

use super::{ChainFileEntry, ConfigError, ConfigFile, RelayArgs};
use crate::{
    constants::MIN_CONFIGURED_CHAINS,
    domain::{ChainRegistry, PipelineSettings, RegistryError},
    models::{ChainDefinition, ChainId},
    services::KeySource,
    supervisor::{RestartBackoff, SupervisorOptions},
    utils::parse_network_id,
};

/// Build flavour baked in at compile time; `dev` builds refuse to run outside unsafe dev mode.
pub const BUILD: Option<&str> = option_env!("RELAY_BUILD");

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validated, immutable configuration of a relayer node.
#[derive(Debug)]
pub struct RelayConfig {
    pub status_addr: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub key_source: KeySource,
    pub registry: ChainRegistry,
    pub log_level: String,
    pub unsafe_dev_mode: bool,
    pub testnet_mode: bool,
    pub node_name: String,
    pub spy_rpc: String,
    pub guardian_rpc: String,
    pub pipeline: PipelineSettings,
    pub rpc_timeout: Duration,
    pub supervisor: SupervisorOptions,
}

impl RelayConfig {
    pub fn from_args(args: RelayArgs) -> Result<Self, ConfigError> {
        Self::from_args_for_build(args, BUILD)
    }

    pub fn from_args_for_build(args: RelayArgs, build: Option<&str>) -> Result<Self, ConfigError> {
        if build == Some("dev") && !args.unsafe_dev_mode {
            return Err(ConfigError::DevBuildRequiresUnsafeDevMode);
        }

        let log_level = args.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(args.log_level));
        }

        if args.data_dir.is_none() && !args.unsafe_dev_mode {
            return Err(ConfigError::MissingField("data-dir".into()));
        }

        let key_source = match (&args.sender_key_path, &args.sender_key_hex) {
            (Some(path), _) => KeySource::File(path.clone()),
            (None, Some(hex)) => KeySource::Hex(Zeroizing::new(hex.clone())),
            (None, None) if args.unsafe_dev_mode => KeySource::Devnet,
            (None, None) => {
                return Err(ConfigError::MissingField(
                    "sender-key-path or sender-key-hex".into(),
                ))
            }
        };

        let node_name = if args.unsafe_dev_mode {
            System::host_name()
                .or_else(|| args.node_name.clone())
                .unwrap_or_else(|| "devnet".to_string())
        } else {
            args.node_name
                .clone()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ConfigError::MissingField("node-name".into()))?
        };

        let spy_rpc = args
            .spy_rpc
            .clone()
            .filter(|addr| !addr.is_empty())
            .ok_or_else(|| ConfigError::MissingField("spy-rpc".into()))?;

        let guardian_rpc = args
            .guardian_rpc
            .clone()
            .filter(|addr| !addr.is_empty())
            .ok_or_else(|| ConfigError::MissingField("guardian-rpc".into()))?;

        let registry = build_registry(&args)?;

        if args.target_gas_limit == 0 {
            return Err(ConfigError::invalid("target-gas-limit", "must be positive"));
        }
        if args.observation_queue_capacity == 0 {
            return Err(ConfigError::invalid(
                "observation-queue-capacity",
                "must be positive",
            ));
        }
        if args.rpc_timeout_secs == 0 {
            return Err(ConfigError::invalid("rpc-timeout-secs", "must be positive"));
        }

        Ok(Self {
            status_addr: Some(args.status_addr).filter(|addr| !addr.is_empty()),
            data_dir: args.data_dir,
            key_source,
            registry,
            log_level,
            unsafe_dev_mode: args.unsafe_dev_mode,
            testnet_mode: args.testnet_mode,
            node_name,
            spy_rpc,
            guardian_rpc,
            pipeline: PipelineSettings {
                observation_queue_capacity: args.observation_queue_capacity,
                target_gas_limit: args.target_gas_limit,
                native_payment: U256::ZERO,
            },
            rpc_timeout: Duration::from_secs(args.rpc_timeout_secs),
            supervisor: SupervisorOptions {
                propagate_panics: args.propagate_panics,
                backoff: RestartBackoff::default(),
            },
        })
    }
}

/// One `--<prefix>-*` flag group.
struct ChainFlags<'a> {
    prefix: &'static str,
    rpc: Option<&'a str>,
    contract: Option<&'a str>,
    wormhole_chain_id: Option<u16>,
    network_id: Option<&'a str>,
}

impl ChainFlags<'_> {
    fn is_empty(&self) -> bool {
        self.rpc.is_none()
            && self.contract.is_none()
            && self.wormhole_chain_id.is_none()
            && self.network_id.is_none()
    }

    fn field(&self, name: &str) -> String {
        format!("{}-{}", self.prefix, name)
    }

    fn required<T>(&self, value: Option<T>, name: &str) -> Result<T, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingField(self.field(name)))
    }

    fn to_definition(&self) -> Result<ChainDefinition, ConfigError> {
        let rpc = self.required(self.rpc, "rpc")?;
        let contract = self.required(self.contract, "contract")?;
        let wormhole_chain_id = self.required(self.wormhole_chain_id, "wormhole-chain-id")?;
        let network_id = self.required(self.network_id, "network-id")?;
        let network_id = parse_network_id(network_id)
            .map_err(|e| ConfigError::invalid(&self.field("network-id"), e))?;

        chain_definition(self.prefix, rpc, contract, wormhole_chain_id, network_id)
    }
}

fn chain_definition(
    label: &str,
    rpc: &str,
    contract: &str,
    wormhole_chain_id: u16,
    network_id: u64,
) -> Result<ChainDefinition, ConfigError> {
    let rpc_url = Url::parse(rpc)
        .map_err(|e| ConfigError::invalid(&format!("{}-rpc", label), e.to_string()))?;
    let contract_address = Address::from_str(contract)
        .map_err(|e| ConfigError::invalid(&format!("{}-contract", label), e.to_string()))?;
    if wormhole_chain_id == 0 {
        return Err(ConfigError::invalid(
            &format!("{}-wormhole-chain-id", label),
            "chain id 0 is reserved",
        ));
    }

    Ok(ChainDefinition {
        chain_id: ChainId(wormhole_chain_id),
        rpc_url,
        contract_address,
        network_id,
    })
}

fn file_chain_definition(
    index: usize,
    entry: &ChainFileEntry,
) -> Result<ChainDefinition, ConfigError> {
    chain_definition(
        &format!("chains[{}]", index),
        &entry.rpc,
        &entry.contract,
        entry.wormhole_chain_id,
        entry.network_id,
    )
}

fn build_registry(args: &RelayArgs) -> Result<ChainRegistry, ConfigError> {
    let flag_groups = [
        ChainFlags {
            prefix: "evm",
            rpc: args.evm_rpc.as_deref(),
            contract: args.evm_contract.as_deref(),
            wormhole_chain_id: args.evm_wormhole_chain_id,
            network_id: args.evm_network_id.as_deref(),
        },
        ChainFlags {
            prefix: "evm2",
            rpc: args.evm2_rpc.as_deref(),
            contract: args.evm2_contract.as_deref(),
            wormhole_chain_id: args.evm2_wormhole_chain_id,
            network_id: args.evm2_network_id.as_deref(),
        },
    ];

    let mut chains = Vec::new();
    for group in flag_groups.iter().filter(|group| !group.is_empty()) {
        chains.push(group.to_definition()?);
    }

    if let Some(path) = &args.config {
        let file = ConfigFile::load(path)?;
        for (index, entry) in file.chains.iter().enumerate() {
            chains.push(file_chain_definition(index, entry)?);
        }
    }

    if chains.len() < MIN_CONFIGURED_CHAINS {
        return Err(ConfigError::TooFewChains {
            required: MIN_CONFIGURED_CHAINS,
            found: chains.len(),
        });
    }

    ChainRegistry::from_definitions(chains).map_err(|e| match e {
        RegistryError::DuplicateChain(chain_id) => ConfigError::DuplicateChain(chain_id),
    })
}
