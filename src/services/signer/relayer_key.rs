use std::{fmt, fs, path::PathBuf};

use alloy::{
    primitives::Address,
    signers::{local::PrivateKeySigner, Signer},
};
use zeroize::Zeroizing;

use super::KeyError;
use crate::constants::DEVNET_SENDER_KEY_HEX;

/// Where the relayer key comes from, in precedence order.
pub enum KeySource {
    /// File holding the hex-encoded key.
    File(PathBuf),
    Hex(Zeroizing<String>),
    /// Well-known devnet account, only allowed in unsafe dev mode.
    Devnet,
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
            KeySource::Hex(_) => f.write_str("Hex(<redacted>)"),
            KeySource::Devnet => f.write_str("Devnet"),
        }
    }
}

/// Private key used to sign delivery transactions on every destination chain.
#[derive(Clone)]
pub struct RelayerKey {
    signer: PrivateKeySigner,
}

impl RelayerKey {
    pub fn load(source: &KeySource) -> Result<Self, KeyError> {
        match source {
            KeySource::File(path) => {
                let contents = Zeroizing::new(fs::read_to_string(path).map_err(|source| {
                    KeyError::Io {
                        path: path.clone(),
                        source,
                    }
                })?);
                Self::from_hex(&contents)
            }
            KeySource::Hex(key) => Self::from_hex(key),
            KeySource::Devnet => Self::from_hex(DEVNET_SENDER_KEY_HEX),
        }
    }

    /// Parses a 32-byte hex key, tolerating surrounding whitespace and a `0x` prefix.
    pub fn from_hex(key: &str) -> Result<Self, KeyError> {
        let trimmed = key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let bytes = Zeroizing::new(
            hex::decode(trimmed).map_err(|e| KeyError::Invalid(format!("not hex: {e}")))?,
        );
        if bytes.len() != 32 {
            return Err(KeyError::Invalid(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let signer =
            PrivateKeySigner::from_slice(&bytes).map_err(|e| KeyError::Invalid(e.to_string()))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signer bound to the EVM chain id of a destination network.
    pub fn signer_for(&self, network_id: u64) -> PrivateKeySigner {
        self.signer.clone().with_chain_id(Some(network_id))
    }
}

impl fmt::Debug for RelayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayerKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
