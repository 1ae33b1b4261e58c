use std::fmt;

use alloy::primitives::{Address, Bytes, B256};

use super::{BatchVaa, ChainId};
use crate::constants::DELIVERY_PAYLOAD_ID;

/// Identifies one VAA by emitter and sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaaId {
    pub emitter_address: B256,
    pub sequence: u64,
}

/// Delivery intent decoded by the source chain's relay contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryInstructions {
    pub payload_id: u8,
    pub from_address: B256,
    pub from_chain: ChainId,
    pub target_address: B256,
    pub target_chain: ChainId,
    pub payload: Bytes,
    pub chain_payload: Bytes,
    pub delivery_list: Vec<VaaId>,
    /// Still encoded; the relay contract on the target chain interprets it.
    pub relay_parameters: Bytes,
}

impl DeliveryInstructions {
    pub fn is_delivery(&self) -> bool {
        self.payload_id == DELIVERY_PAYLOAD_ID
    }
}

/// Position of the delivery observation inside a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeliveryIndex(pub u8);

impl fmt::Display for DeliveryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of scanning a batch for observations emitted by a relay contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryLocation {
    NotFound,
    Found(DeliveryIndex),
    Ambiguous(Vec<DeliveryIndex>),
}

impl DeliveryLocation {
    /// Scans `batch` for observations whose EVM emitter equals `contract`.
    pub fn locate(batch: &BatchVaa, contract: &Address) -> Self {
        let mut matches: Vec<DeliveryIndex> = batch
            .observations
            .iter()
            .enumerate()
            .filter(|(_, indexed)| indexed.observation.emitter_evm_address() == *contract)
            .filter_map(|(position, _)| u8::try_from(position).ok().map(DeliveryIndex))
            .collect();

        match matches.len() {
            0 => DeliveryLocation::NotFound,
            1 => DeliveryLocation::Found(matches.remove(0)),
            _ => DeliveryLocation::Ambiguous(matches),
        }
    }
}

/// Arguments of the destination contract's `deliver` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDeliveryParameters {
    /// The signed batch exactly as received from the spy.
    pub encoded_vm: Bytes,
    pub delivery_index: DeliveryIndex,
    pub target_call_gas_override: u32,
}
