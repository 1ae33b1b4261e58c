//! Optional JSON file listing chains beyond the `--evm*` / `--evm2*` flags.
//!
//! ```json
//! {
//!   "chains": [
//!     { "rpc": "http://localhost:8547", "contract": "0x...", "wormholeChainId": 6, "networkId": 1338 }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::utils::deserialize_network_id;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub chains: Vec<ChainFileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChainFileEntry {
    pub rpc: String,
    pub contract: String,
    pub wormhole_chain_id: u16,
    #[serde(deserialize_with = "deserialize_network_id")]
    pub network_id: u64,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
