use alloy::sol;

use crate::models::{ChainId, DeliveryInstructions, TargetDeliveryParameters, VaaId};

sol! {
    #[sol(rpc)]
    contract CoreRelayer {
        struct VAAId {
            bytes32 emitterAddress;
            uint64 sequence;
        }

        struct DeliveryInstructions {
            uint8 payloadId;
            bytes32 fromAddress;
            uint16 fromChain;
            bytes32 targetAddress;
            uint16 targetChain;
            bytes payload;
            bytes chainPayload;
            VAAId[] deliveryList;
            bytes relayParameters;
        }

        struct TargetDeliveryParameters {
            bytes encodedVM;
            uint8 deliveryIndex;
            uint32 targetCallGasOverride;
        }

        function decodeDeliveryInstructions(bytes memory encoded)
            public
            pure
            returns (DeliveryInstructions memory instructions);

        function deliver(TargetDeliveryParameters memory targetParams)
            public
            payable
            returns (uint64 sequence);
    }
}

impl From<CoreRelayer::DeliveryInstructions> for DeliveryInstructions {
    fn from(value: CoreRelayer::DeliveryInstructions) -> Self {
        Self {
            payload_id: value.payloadId,
            from_address: value.fromAddress,
            from_chain: ChainId(value.fromChain),
            target_address: value.targetAddress,
            target_chain: ChainId(value.targetChain),
            payload: value.payload,
            chain_payload: value.chainPayload,
            delivery_list: value
                .deliveryList
                .into_iter()
                .map(|id| VaaId {
                    emitter_address: id.emitterAddress,
                    sequence: id.sequence,
                })
                .collect(),
            relay_parameters: value.relayParameters,
        }
    }
}

impl From<TargetDeliveryParameters> for CoreRelayer::TargetDeliveryParameters {
    fn from(value: TargetDeliveryParameters) -> Self {
        Self {
            encodedVM: value.encoded_vm,
            deliveryIndex: value.delivery_index.0,
            targetCallGasOverride: value.target_call_gas_override,
        }
    }
}
