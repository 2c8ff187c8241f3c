//! Settlement output of one reward computation.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, BlsPublicKey, ShardId, Slot};

/// One validator-level payout. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub shard_id: ShardId,
    pub earning_address: Address,
    pub amount: Amount,
    pub earning_key: BlsPublicKey,
}

/// Result of settling one block's rewards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSettlement {
    pub total_newly_minted: Amount,
    /// Beacon committee members that did not sign.
    pub missing_signers: Vec<Slot>,
    pub beacon_payouts: Vec<PayoutRecord>,
    pub shard_payouts: Vec<PayoutRecord>,
}

impl RewardSettlement {
    /// Nothing minted, nobody paid.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flat-split era: only the minted total is reported.
    pub fn pre_staking(total: Amount) -> Self {
        Self {
            total_newly_minted: total,
            ..Self::default()
        }
    }

    pub fn staking(
        total: Amount,
        missing_signers: Vec<Slot>,
        beacon_payouts: Vec<PayoutRecord>,
        shard_payouts: Vec<PayoutRecord>,
    ) -> Self {
        Self {
            total_newly_minted: total,
            missing_signers,
            beacon_payouts,
            shard_payouts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_newly_minted == 0
            && self.missing_signers.is_empty()
            && self.beacon_payouts.is_empty()
            && self.shard_payouts.is_empty()
    }

    /// Sum of all validator-level payouts.
    pub fn total_payout(&self) -> Amount {
        self.beacon_payouts
            .iter()
            .chain(self.shard_payouts.iter())
            .fold(0, |acc: Amount, p| acc.saturating_add(p.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: Amount) -> PayoutRecord {
        PayoutRecord {
            shard_id: 1,
            earning_address: [1; 20],
            amount,
            earning_key: BlsPublicKey([1; 48]),
        }
    }

    #[test]
    fn test_empty_settlement() {
        assert!(RewardSettlement::empty().is_empty());
        assert!(!RewardSettlement::pre_staking(24).is_empty());
    }

    #[test]
    fn test_total_payout_sums_both_lists() {
        let settlement =
            RewardSettlement::staking(30, vec![], vec![record(10)], vec![record(15), record(5)]);
        assert_eq!(settlement.total_payout(), 30);
    }
}
