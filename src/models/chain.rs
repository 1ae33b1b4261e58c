use std::fmt;

use alloy::primitives::Address;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Wormhole chain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u16);

impl ChainId {
    pub const UNSET: ChainId = ChainId(0);
    pub const SOLANA: ChainId = ChainId(1);
    pub const ETHEREUM: ChainId = ChainId(2);
    pub const TERRA: ChainId = ChainId(3);
    pub const BSC: ChainId = ChainId(4);
    pub const POLYGON: ChainId = ChainId(5);
    pub const AVALANCHE: ChainId = ChainId(6);
    pub const OASIS: ChainId = ChainId(7);
    pub const ALGORAND: ChainId = ChainId(8);
    pub const AURORA: ChainId = ChainId(9);
    pub const FANTOM: ChainId = ChainId(10);
    pub const KARURA: ChainId = ChainId(11);
    pub const ACALA: ChainId = ChainId(12);
    pub const KLAYTN: ChainId = ChainId(13);
    pub const CELO: ChainId = ChainId(14);

    /// Well-known name of the chain, if any.
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            ChainId::SOLANA => "solana",
            ChainId::ETHEREUM => "ethereum",
            ChainId::TERRA => "terra",
            ChainId::BSC => "bsc",
            ChainId::POLYGON => "polygon",
            ChainId::AVALANCHE => "avalanche",
            ChainId::OASIS => "oasis",
            ChainId::ALGORAND => "algorand",
            ChainId::AURORA => "aurora",
            ChainId::FANTOM => "fantom",
            ChainId::KARURA => "karura",
            ChainId::ACALA => "acala",
            ChainId::KLAYTN => "klaytn",
            ChainId::CELO => "celo",
            _ => return None,
        };
        Some(name)
    }
}

impl From<u16> for ChainId {
    fn from(value: u16) -> Self {
        ChainId(value)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "unknown chain ID: {}", self.0),
        }
    }
}

/// A network this relayer can read from and submit deliveries to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDefinition {
    pub chain_id: ChainId,
    pub rpc_url: Url,
    /// Relay contract deployed on this chain.
    pub contract_address: Address,
    /// EVM chain id used when signing transactions.
    pub network_id: u64,
}
