//! Signed batch VAA (version 2) as streamed by the spy.
//!
//! All integers are big-endian. The batch carries guardian signatures over the
//! observation hashes followed by the indexed observations themselves.
use alloy::primitives::{Address, B256};

use super::{ChainId, VaaError};
use crate::constants::BATCH_VAA_VERSION;

/// Length of a guardian signature (r, s, v).
pub const SIGNATURE_LENGTH: usize = 65;

/// Fixed part of an observation body preceding the payload.
pub const OBSERVATION_HEADER_LENGTH: usize = 4 + 4 + 2 + 32 + 8 + 1;

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], VaaError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(VaaError::Truncated(what))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], VaaError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u8(&mut self, what: &'static str) -> Result<u8, VaaError> {
        Ok(self.take(1, what)?[0])
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, VaaError> {
        Ok(u16::from_be_bytes(self.array(what)?))
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, VaaError> {
        Ok(u32::from_be_bytes(self.array(what)?))
    }

    fn u64(&mut self, what: &'static str) -> Result<u64, VaaError> {
        Ok(u64::from_be_bytes(self.array(what)?))
    }

    fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianSignature {
    pub index: u8,
    pub signature: [u8; SIGNATURE_LENGTH],
}

/// A single attestation inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: ChainId,
    /// Emitter in Wormhole's 32-byte universal format.
    pub emitter_address: B256,
    pub sequence: u64,
    pub consistency_level: u8,
    pub payload: Vec<u8>,
}

impl Observation {
    pub fn decode(body: &[u8]) -> Result<Self, VaaError> {
        if body.len() < OBSERVATION_HEADER_LENGTH {
            return Err(VaaError::Truncated("observation header"));
        }
        let mut reader = ByteReader::new(body);
        Ok(Self {
            timestamp: reader.u32("timestamp")?,
            nonce: reader.u32("nonce")?,
            emitter_chain: ChainId(reader.u16("emitter chain")?),
            emitter_address: B256::from(reader.array::<32>("emitter address")?),
            sequence: reader.u64("sequence")?,
            consistency_level: reader.u8("consistency level")?,
            payload: reader.rest().to_vec(),
        })
    }

    /// EVM view of the emitter: its trailing 20 bytes.
    pub fn emitter_evm_address(&self) -> Address {
        Address::from_slice(&self.emitter_address[12..])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedObservation {
    /// Index assigned by the guardians, not necessarily the position in the batch.
    pub index: u8,
    pub observation: Observation,
}

/// Decoded signed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchVaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<GuardianSignature>,
    pub hashes: Vec<B256>,
    pub observations: Vec<IndexedObservation>,
}

impl BatchVaa {
    /// Decodes a batch from its wire representation.
    ///
    /// Never panics: every malformed input maps to a [`VaaError`].
    pub fn decode(data: &[u8]) -> Result<Self, VaaError> {
        let mut reader = ByteReader::new(data);

        let version = reader.u8("version")?;
        if version != BATCH_VAA_VERSION {
            return Err(VaaError::UnsupportedVersion {
                found: version,
                expected: BATCH_VAA_VERSION,
            });
        }
        let guardian_set_index = reader.u32("guardian set index")?;

        let signature_count = reader.u8("signature count")?;
        let mut signatures = Vec::with_capacity(signature_count as usize);
        for _ in 0..signature_count {
            signatures.push(GuardianSignature {
                index: reader.u8("guardian index")?,
                signature: reader.array::<SIGNATURE_LENGTH>("signature")?,
            });
        }

        let hash_count = reader.u8("hash count")?;
        let mut hashes = Vec::with_capacity(hash_count as usize);
        for _ in 0..hash_count {
            hashes.push(B256::from(reader.array::<32>("observation hash")?));
        }

        let observation_count = reader.u8("observation count")?;
        if observation_count == 0 {
            return Err(VaaError::EmptyBatch);
        }
        let mut observations = Vec::with_capacity(observation_count as usize);
        for _ in 0..observation_count {
            let index = reader.u8("observation index")?;
            let len = reader.u32("observation length")? as usize;
            let body = reader.take(len, "observation body")?;
            observations.push(IndexedObservation {
                index,
                observation: Observation::decode(body)?,
            });
        }

        if reader.remaining() > 0 {
            return Err(VaaError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            version,
            guardian_set_index,
            signatures,
            hashes,
            observations,
        })
    }

    /// Chain the batch originates from: the emitter chain of its first observation.
    pub fn source_chain(&self) -> Option<ChainId> {
        self.observations
            .first()
            .map(|indexed| indexed.observation.emitter_chain)
    }
}
