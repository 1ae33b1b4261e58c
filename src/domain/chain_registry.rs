use std::collections::HashMap;

use thiserror::Error;

use crate::models::{ChainDefinition, ChainId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Chain {0} is registered more than once")]
    DuplicateChain(ChainId),
}

/// Collects chain definitions at startup.
#[derive(Debug, Default)]
pub struct ChainRegistryBuilder {
    chains: HashMap<ChainId, ChainDefinition>,
}

impl ChainRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, chain: ChainDefinition) -> Result<Self, RegistryError> {
        if self.chains.contains_key(&chain.chain_id) {
            return Err(RegistryError::DuplicateChain(chain.chain_id));
        }
        self.chains.insert(chain.chain_id, chain);
        Ok(self)
    }

    pub fn build(self) -> ChainRegistry {
        ChainRegistry {
            chains: self.chains,
        }
    }
}

/// Immutable map of every chain this relayer serves.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: HashMap<ChainId, ChainDefinition>,
}

impl ChainRegistry {
    pub fn builder() -> ChainRegistryBuilder {
        ChainRegistryBuilder::new()
    }

    /// Builds a registry from a list of definitions, rejecting duplicates.
    pub fn from_definitions(
        chains: impl IntoIterator<Item = ChainDefinition>,
    ) -> Result<Self, RegistryError> {
        chains
            .into_iter()
            .try_fold(ChainRegistryBuilder::new(), |builder, chain| {
                builder.register(chain)
            })
            .map(ChainRegistryBuilder::build)
    }

    /// Unknown chains are not an error.
    pub fn lookup(&self, chain_id: ChainId) -> Option<&ChainDefinition> {
        self.chains.get(&chain_id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainDefinition> {
        self.chains.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::chain_definition;
    use alloy::primitives::Address;

    #[test]
    fn test_lookup_registered_chain() {
        let registry = ChainRegistry::builder()
            .register(chain_definition(ChainId::ETHEREUM, Address::repeat_byte(1), 1))
            .unwrap()
            .register(chain_definition(ChainId::BSC, Address::repeat_byte(2), 56))
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        let bsc = registry.lookup(ChainId::BSC).unwrap();
        assert_eq!(bsc.network_id, 56);
        assert_eq!(bsc.contract_address, Address::repeat_byte(2));
    }

    #[test]
    fn test_lookup_unknown_chain_is_none() {
        let registry = ChainRegistry::from_definitions(vec![chain_definition(
            ChainId::ETHEREUM,
            Address::ZERO,
            1,
        )])
        .unwrap();
        assert!(registry.lookup(ChainId::SOLANA).is_none());
    }

    #[test]
    fn test_duplicate_chain_is_rejected() {
        let result = ChainRegistry::from_definitions(vec![
            chain_definition(ChainId::ETHEREUM, Address::ZERO, 1),
            chain_definition(ChainId::ETHEREUM, Address::repeat_byte(3), 5),
        ]);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateChain(ChainId::ETHEREUM)
        );
    }
}
