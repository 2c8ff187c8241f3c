//! Reward settlement configuration.

use std::time::Duration;

/// Reward settlement configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardConfig {
    /// Longest wait for commit signatures before failing the block.
    pub commit_sigs_timeout: Duration,
    /// Rosters kept, keyed by (epoch, shard).
    pub voting_power_cache_capacity: usize,
    /// Delegator share maps kept, keyed by (epoch, validator).
    pub delegator_share_cache_capacity: usize,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            commit_sigs_timeout: Duration::from_secs(9),
            voting_power_cache_capacity: 16,
            delegator_share_cache_capacity: 1024,
        }
    }
}

impl RewardConfig {
    /// Create config for testing (short timeout, small caches).
    pub fn for_testing() -> Self {
        Self {
            commit_sigs_timeout: Duration::from_millis(100),
            voting_power_cache_capacity: 4,
            delegator_share_cache_capacity: 8,
        }
    }
}
