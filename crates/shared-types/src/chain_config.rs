//! Fork schedule for the shard chain.

use crate::entities::Epoch;
use serde::{Deserialize, Serialize};

/// Epoch-based fork schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// First epoch paying staked rewards via cross-links.
    pub staking_epoch: Epoch,
    /// First epoch with 5 second block time.
    pub five_seconds_epoch: Epoch,
    /// First epoch with 2 second block time.
    pub two_seconds_epoch: Epoch,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            staking_epoch: 186,
            five_seconds_epoch: 230,
            two_seconds_epoch: 366,
        }
    }
}

impl ChainConfig {
    /// Create config for testing: staking from epoch 1, no block time forks.
    pub fn for_testing() -> Self {
        Self {
            chain_id: 2,
            staking_epoch: 1,
            five_seconds_epoch: Epoch::MAX,
            two_seconds_epoch: Epoch::MAX,
        }
    }

    pub fn is_staking(&self, epoch: Epoch) -> bool {
        epoch >= self.staking_epoch
    }

    pub fn is_five_seconds(&self, epoch: Epoch) -> bool {
        epoch >= self.five_seconds_epoch
    }

    pub fn is_two_seconds(&self, epoch: Epoch) -> bool {
        epoch >= self.two_seconds_epoch
    }
}
