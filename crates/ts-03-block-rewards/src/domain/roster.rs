//! Voting power of one committee in one epoch.

use serde::{Deserialize, Serialize};
use shared_types::{Address, BlsPublicKey, Dec, Epoch, ShardId};
use std::collections::HashMap;

/// Voting power of one committee seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// Share of the committee's total voting power.
    pub overall_percent: Dec,
    /// Foundational (unstaked) node; never paid.
    pub is_foundational: bool,
    pub earning_account: Address,
    pub identity: BlsPublicKey,
    pub effective_stake: Dec,
}

/// Voting power of every seat in a committee, keyed by BLS key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRoster {
    pub epoch: Epoch,
    pub shard_id: ShardId,
    pub voters: HashMap<BlsPublicKey, Voter>,
    pub total_effective_stake: Dec,
}

impl VotingRoster {
    pub fn new(epoch: Epoch, shard_id: ShardId) -> Self {
        Self {
            epoch,
            shard_id,
            voters: HashMap::new(),
            total_effective_stake: Dec::zero(),
        }
    }

    pub fn voter(&self, key: &BlsPublicKey) -> Option<&Voter> {
        self.voters.get(key)
    }

    /// Sum of `overall_percent` over all voters.
    pub fn total_percent(&self) -> Dec {
        self.voters
            .values()
            .fold(Dec::zero(), |acc, v| acc.add(v.overall_percent))
    }
}
