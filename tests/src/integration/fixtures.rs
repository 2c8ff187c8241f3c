//! Shared fixtures: real BLS committees and in-memory chains.

use shared_types::{
    Address, BlockHeader, ChainConfig, Committee, Dec, Epoch, Hash, ShardId, ShardState, Slot,
};
use ts_01_signature_aggregation::SigningKey;
use ts_03_block_rewards::{Delegation, InMemoryChain, ValidatorSnapshot};
use ts_telemetry::{init_tracing, TelemetryConfig};

/// Epoch every fixture block lives in.
pub const EPOCH: Epoch = 2;

/// Install a debug subscriber once per test binary.
pub fn init_test_logging() {
    // a second install in the same binary fails, which is fine
    let _ = init_tracing(&TelemetryConfig::for_testing());
}

/// One committee with its members' signing keys, in slot order.
pub struct TestCommittee {
    pub keys: Vec<SigningKey>,
    pub committee: Committee,
}

impl TestCommittee {
    /// Seat one member per `stakes` entry; `None` is a foundational seat.
    ///
    /// Member `i` gets key material `[seed + i; 32]` and address
    /// `[seed + i; 20]`.
    pub fn new(shard_id: ShardId, seed: u8, stakes: &[Option<u128>]) -> Self {
        let mut keys = Vec::with_capacity(stakes.len());
        let mut slots = Vec::with_capacity(stakes.len());
        for (i, stake) in stakes.iter().enumerate() {
            let tag = seed + i as u8;
            let key = SigningKey::from_ikm(&[tag; 32]).expect("valid ikm");
            slots.push(Slot {
                bls_public_key: key.public_key(),
                ecdsa_address: [tag; 20],
                effective_stake: stake.map(Dec::from_int),
            });
            keys.push(key);
        }
        Self {
            keys,
            committee: Committee::new(shard_id, slots),
        }
    }

    pub fn address(&self, index: usize) -> Address {
        self.committee.slots[index].ecdsa_address
    }

    /// Keys at `indices`, in the order given.
    pub fn signers(&self, indices: &[usize]) -> Vec<SigningKey> {
        indices.iter().map(|i| self.keys[*i].clone()).collect()
    }
}

/// Header at `number` in `EPOCH` on `shard_id`.
pub fn header(number: u64, shard_id: ShardId, parent_hash: Hash) -> BlockHeader {
    BlockHeader {
        number,
        epoch: EPOCH,
        shard_id,
        view_id: number,
        hash: [number as u8; 32],
        parent_hash,
        timestamp: 1_600_000_000 + number,
        last_commit_signature: None,
        last_commit_bitmap: vec![],
        cross_links: vec![],
    }
}

/// Beacon chain node in the staking era, holding `committees` for `EPOCH`
/// and a self-delegated snapshot for every staked seat.
pub fn beacon_chain(committees: &[&TestCommittee]) -> InMemoryChain {
    let chain = InMemoryChain::new(ChainConfig::for_testing());
    chain.insert_shard_state(ShardState {
        epoch: EPOCH,
        shards: committees.iter().map(|c| c.committee.clone()).collect(),
    });
    for committee in committees {
        for slot in &committee.committee.slots {
            if slot.effective_stake.is_some() {
                chain.insert_snapshot(ValidatorSnapshot {
                    epoch: EPOCH,
                    address: slot.ecdsa_address,
                    commission_rate: Dec::new_with_prec(1, 1),
                    delegations: vec![
                        Delegation {
                            delegator_address: slot.ecdsa_address,
                            amount: 300,
                        },
                        Delegation {
                            delegator_address: [0xDD; 20],
                            amount: 100,
                        },
                    ],
                });
            }
        }
    }
    chain
}
