//! Fixtures shared by unit tests.

use alloy::{
    primitives::{address, Address, Bytes, B256},
    signers::local::PrivateKeySigner,
};

use crate::{
    constants::{DEVNET_SENDER_KEY_HEX, DELIVERY_PAYLOAD_ID},
    domain::ChainRegistry,
    models::{ChainDefinition, ChainId, DeliveryInstructions},
    services::RelayerKey,
};

pub const ETH_RELAY: Address = address!("1111111111111111111111111111111111111111");
pub const BSC_RELAY: Address = address!("2222222222222222222222222222222222222222");

/// Body of one observation in batch wire format.
pub fn observation_body(
    emitter_chain: ChainId,
    emitter_address: B256,
    sequence: u64,
    payload: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1_700_000_000u32.to_be_bytes());
    body.extend_from_slice(&42u32.to_be_bytes());
    body.extend_from_slice(&emitter_chain.0.to_be_bytes());
    body.extend_from_slice(emitter_address.as_slice());
    body.extend_from_slice(&sequence.to_be_bytes());
    body.push(15);
    body.extend_from_slice(payload);
    body
}

/// Wraps observation bodies into a version 2 batch with a single dummy signature.
pub fn encode_batch(observations: &[Vec<u8>]) -> Vec<u8> {
    let mut raw = vec![2u8];
    raw.extend_from_slice(&0u32.to_be_bytes());

    raw.push(1);
    raw.push(0);
    raw.extend_from_slice(&[1u8; 65]);

    raw.push(observations.len() as u8);
    for i in 0..observations.len() {
        raw.extend_from_slice(&[i as u8; 32]);
    }

    raw.push(observations.len() as u8);
    for (i, body) in observations.iter().enumerate() {
        raw.push(i as u8);
        raw.extend_from_slice(&(body.len() as u32).to_be_bytes());
        raw.extend_from_slice(body);
    }
    raw
}

/// Universal (left-padded) form of an EVM address.
pub fn evm_emitter(address: Address) -> B256 {
    address.into_word()
}

pub fn chain_definition(chain_id: ChainId, contract: Address, network_id: u64) -> ChainDefinition {
    ChainDefinition {
        chain_id,
        rpc_url: "http://127.0.0.1:8545".parse().unwrap(),
        contract_address: contract,
        network_id,
    }
}

pub fn chain_definition_at(chain_id: ChainId, rpc_url: &str, contract: Address) -> ChainDefinition {
    ChainDefinition {
        rpc_url: rpc_url.parse().unwrap(),
        ..chain_definition(chain_id, contract, 1337)
    }
}

/// Ethereum (network 1) and BSC (network 56).
pub fn test_registry() -> ChainRegistry {
    ChainRegistry::from_definitions(vec![
        chain_definition(ChainId::ETHEREUM, ETH_RELAY, 1),
        chain_definition(ChainId::BSC, BSC_RELAY, 56),
    ])
    .unwrap()
}

pub fn sample_instructions(target_chain: ChainId) -> DeliveryInstructions {
    DeliveryInstructions {
        payload_id: DELIVERY_PAYLOAD_ID,
        from_address: B256::repeat_byte(0xaa),
        from_chain: ChainId::ETHEREUM,
        target_address: B256::repeat_byte(0xbb),
        target_chain,
        payload: Bytes::from_static(b"hello"),
        chain_payload: Bytes::new(),
        delivery_list: vec![],
        relay_parameters: Bytes::from_static(&[1]),
    }
}

pub fn test_key() -> RelayerKey {
    RelayerKey::from_hex(DEVNET_SENDER_KEY_HEX).unwrap()
}

pub fn test_signer() -> PrivateKeySigner {
    test_key().signer_for(1337)
}
