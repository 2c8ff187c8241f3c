//! # Core Domain Entities
//!
//! Defines the shard-chain entities shared by the signature, consensus
//! message and block reward subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `BlsPublicKey`, `BlsSignature`, `Address`
//! - **Committees**: `Slot`, `Committee`, `ShardState`
//! - **Chain**: `BlockHeader`, `CrossLink`

use crate::errors::ChainError;
use crate::numeric::Dec;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::collections::BTreeSet;
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte hash (keccak-256).
pub type Hash = [u8; 32];

/// A 20-byte ECDSA earning address.
pub type Address = [u8; 20];

/// Shard identifier. Shard 0 is the beacon chain.
pub type ShardId = u32;

/// Epoch number.
pub type Epoch = u64;

/// Token amount in atto units (10^-18 of one token).
pub type Amount = u128;

/// The beacon chain's shard id.
pub const BEACON_CHAIN_SHARD_ID: ShardId = 0;

/// Compressed BLS12-381 G1 public key length.
pub const BLS_PUBLIC_KEY_LEN: usize = 48;

/// Compressed BLS12-381 G2 signature length.
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Serialized BLS public key (48 bytes, compressed G1 point).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlsPublicKey(#[serde_as(as = "Bytes")] pub [u8; BLS_PUBLIC_KEY_LEN]);

impl BlsPublicKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; BLS_PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Hex encoding, used in logs and error context.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsPublicKey({})", self.to_hex())
    }
}

/// Serialized BLS signature (96 bytes, compressed G2 point).
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlsSignature(#[serde_as(as = "Bytes")] pub [u8; BLS_SIGNATURE_LEN]);

impl BlsSignature {
    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; BLS_SIGNATURE_LEN] {
        &self.0
    }

    /// Parse from a byte slice of exactly `BLS_SIGNATURE_LEN` bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; BLS_SIGNATURE_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

impl fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlsSignature({}..)", hex::encode(&self.0[..8]))
    }
}

// =============================================================================
// CLUSTER B: COMMITTEES
// =============================================================================

/// One validator seat in a committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Consensus signing key.
    pub bls_public_key: BlsPublicKey,
    /// Address credited with rewards.
    pub ecdsa_address: Address,
    /// Effective stake; `None` for foundational (unstaked) nodes.
    pub effective_stake: Option<Dec>,
}

/// The ordered validator slots voting for one shard in one epoch.
///
/// Slot order is authoritative: bitmap bit *i* refers to `slots[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Committee {
    pub shard_id: ShardId,
    pub slots: Vec<Slot>,
}

impl Committee {
    /// Create a committee for a shard.
    pub fn new(shard_id: ShardId, slots: Vec<Slot>) -> Self {
        Self { shard_id, slots }
    }

    /// BLS keys in slot order.
    pub fn bls_public_keys(&self) -> Vec<BlsPublicKey> {
        self.slots.iter().map(|s| s.bls_public_key).collect()
    }

    /// Addresses of slots carrying effective stake.
    pub fn staked_validators(&self) -> BTreeSet<Address> {
        self.slots
            .iter()
            .filter(|s| s.effective_stake.is_some())
            .map(|s| s.ecdsa_address)
            .collect()
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// All shard committees elected for an epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardState {
    pub epoch: Epoch,
    pub shards: Vec<Committee>,
}

impl ShardState {
    /// Find the committee serving `shard_id`.
    pub fn find_committee_by_id(&self, shard_id: ShardId) -> Result<&Committee, ChainError> {
        self.shards
            .iter()
            .find(|c| c.shard_id == shard_id)
            .ok_or(ChainError::CommitteeNotFound {
                shard_id,
                epoch: self.epoch,
            })
    }
}

// =============================================================================
// CLUSTER C: CHAIN
// =============================================================================

/// A finalized shard block's attestation, carried in a beacon header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossLink {
    pub epoch: Epoch,
    pub shard_id: ShardId,
    pub block_num: u64,
    pub block_hash: Hash,
    /// Commit bitmap over the shard committee of `epoch`.
    pub signer_bitmap: Vec<u8>,
}

/// Encode cross-links in the header wire format.
pub fn encode_cross_links(links: &[CrossLink]) -> Result<Vec<u8>, ChainError> {
    bincode::serialize(links).map_err(|e| ChainError::CrossLinkDecode(e.to_string()))
}

/// Decode the header wire format back into cross-links.
pub fn decode_cross_links(bytes: &[u8]) -> Result<Vec<CrossLink>, ChainError> {
    bincode::deserialize(bytes).map_err(|e| ChainError::CrossLinkDecode(e.to_string()))
}

/// The header of a block, as far as consensus and rewards need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height in the shard chain.
    pub number: u64,
    pub epoch: Epoch,
    pub shard_id: ShardId,
    pub view_id: u64,
    pub hash: Hash,
    pub parent_hash: Hash,
    /// Unix timestamp when the block was proposed.
    pub timestamp: u64,
    /// Aggregate commit signature over the parent block.
    pub last_commit_signature: Option<BlsSignature>,
    /// Commit bitmap over the parent epoch's committee.
    pub last_commit_bitmap: Vec<u8>,
    /// Encoded cross-links (beacon headers only; empty otherwise).
    pub cross_links: Vec<u8>,
}

impl BlockHeader {
    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.number == 0
    }

    /// Decoded cross-links. An empty field decodes to no links.
    pub fn cross_links(&self) -> Result<Vec<CrossLink>, ChainError> {
        if self.cross_links.is_empty() {
            return Ok(Vec::new());
        }
        decode_cross_links(&self.cross_links)
    }

    /// Hex form of the header hash for logs and error context.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(i: u8, staked: bool) -> Slot {
        Slot {
            bls_public_key: BlsPublicKey([i; BLS_PUBLIC_KEY_LEN]),
            ecdsa_address: [i; 20],
            effective_stake: staked.then(|| Dec::from_int(100)),
        }
    }

    #[test]
    fn test_staked_validators_excludes_foundational() {
        let committee = Committee::new(1, vec![slot(1, true), slot(2, false), slot(3, true)]);
        let staked = committee.staked_validators();
        assert_eq!(staked.len(), 2);
        assert!(staked.contains(&[1u8; 20]));
        assert!(!staked.contains(&[2u8; 20]));
    }

    #[test]
    fn test_find_committee_by_id() {
        let state = ShardState {
            epoch: 7,
            shards: vec![Committee::new(0, vec![slot(1, true)]), Committee::new(1, vec![])],
        };
        assert_eq!(state.find_committee_by_id(0).unwrap().len(), 1);
        assert!(matches!(
            state.find_committee_by_id(3),
            Err(ChainError::CommitteeNotFound { shard_id: 3, epoch: 7 })
        ));
    }

    #[test]
    fn test_cross_links_encoding() {
        let links = vec![CrossLink {
            epoch: 4,
            shard_id: 2,
            block_num: 99,
            block_hash: [9u8; 32],
            signer_bitmap: vec![0b0000_0101],
        }];
        let header = BlockHeader {
            number: 10,
            epoch: 4,
            shard_id: BEACON_CHAIN_SHARD_ID,
            view_id: 10,
            hash: [1u8; 32],
            parent_hash: [0u8; 32],
            timestamp: 0,
            last_commit_signature: None,
            last_commit_bitmap: vec![],
            cross_links: encode_cross_links(&links).unwrap(),
        };
        assert_eq!(header.cross_links().unwrap(), links);
    }

    #[test]
    fn test_garbage_cross_links_rejected() {
        assert!(matches!(
            decode_cross_links(&[0xFF, 0x01]),
            Err(ChainError::CrossLinkDecode(_))
        ));
    }

    #[test]
    fn test_signature_from_slice_length() {
        assert!(BlsSignature::from_slice(&[0u8; 95]).is_none());
        assert!(BlsSignature::from_slice(&[0u8; BLS_SIGNATURE_LEN]).is_some());
    }
}
