//! # Stake-Weighted Voting Power
//!
//! Foundational (unstaked) slots share a fixed percentage of the vote
//! equally; staked slots share the rest in proportion to effective stake.
//! A committee without stake gives foundational slots the whole vote.

use crate::domain::roster::{Voter, VotingRoster};
use crate::ports::outbound::VotingPowerComputer;
use shared_types::{ChainError, Committee, Dec, Epoch};

/// Default `VotingPowerComputer`.
#[derive(Debug, Clone, Copy)]
pub struct StakeWeightedVotingPower {
    /// Combined voting power of all foundational slots when stake exists.
    pub foundational_percent: Dec,
}

impl Default for StakeWeightedVotingPower {
    fn default() -> Self {
        Self {
            foundational_percent: Dec::new_with_prec(68, 2),
        }
    }
}

impl StakeWeightedVotingPower {
    pub fn new(foundational_percent: Dec) -> Self {
        Self {
            foundational_percent,
        }
    }
}

impl VotingPowerComputer for StakeWeightedVotingPower {
    fn compute(&self, committee: &Committee, epoch: Epoch) -> Result<VotingRoster, ChainError> {
        let foundational = committee
            .slots
            .iter()
            .filter(|s| s.effective_stake.is_none())
            .count();
        let total_stake = committee
            .slots
            .iter()
            .filter_map(|s| s.effective_stake)
            .fold(Dec::zero(), Dec::add);

        let (foundational_pool, staked_pool) = match (foundational, total_stake.is_zero()) {
            (0, _) => (Dec::zero(), Dec::one()),
            (_, true) => (Dec::one(), Dec::zero()),
            (_, false) => {
                let pool = self.foundational_percent.min(Dec::one());
                (pool, Dec::one().checked_sub(pool).unwrap_or_default())
            }
        };
        let foundational_each = foundational_pool
            .checked_quo(Dec::from_int(foundational as u128))
            .unwrap_or_default();

        let mut roster = VotingRoster::new(epoch, committee.shard_id);
        roster.total_effective_stake = total_stake;
        for slot in &committee.slots {
            let (overall_percent, effective_stake) = match slot.effective_stake {
                None => (foundational_each, Dec::zero()),
                Some(stake) => (
                    stake
                        .checked_quo(total_stake)
                        .map(|fraction| fraction.mul(staked_pool))
                        .unwrap_or_default(),
                    stake,
                ),
            };
            roster.voters.insert(
                slot.bls_public_key,
                Voter {
                    overall_percent,
                    is_foundational: slot.effective_stake.is_none(),
                    earning_account: slot.ecdsa_address,
                    identity: slot.bls_public_key,
                    effective_stake,
                },
            );
        }
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{BlsPublicKey, Slot};

    fn slot(i: u8, stake: Option<u128>) -> Slot {
        Slot {
            bls_public_key: BlsPublicKey([i; 48]),
            ecdsa_address: [i; 20],
            effective_stake: stake.map(Dec::from_int),
        }
    }

    fn percent(roster: &VotingRoster, i: u8) -> Dec {
        roster.voter(&BlsPublicKey([i; 48])).unwrap().overall_percent
    }

    #[test]
    fn test_mixed_committee() {
        let committee = Committee::new(
            1,
            vec![slot(1, None), slot(2, None), slot(3, Some(300)), slot(4, Some(100))],
        );
        let roster = StakeWeightedVotingPower::new(Dec::new_with_prec(5, 1))
            .compute(&committee, 9)
            .unwrap();

        assert_eq!(percent(&roster, 1), Dec::new_with_prec(25, 2));
        assert_eq!(percent(&roster, 2), Dec::new_with_prec(25, 2));
        assert_eq!(percent(&roster, 3), Dec::new_with_prec(375, 3));
        assert_eq!(percent(&roster, 4), Dec::new_with_prec(125, 3));
        assert_eq!(roster.total_percent(), Dec::one());
        assert_eq!(roster.total_effective_stake, Dec::from_int(400));
        assert!(roster.voter(&BlsPublicKey([1; 48])).unwrap().is_foundational);
    }

    #[test]
    fn test_unstaked_committee_is_all_foundational() {
        let committee = Committee::new(0, vec![slot(1, None), slot(2, None)]);
        let roster = StakeWeightedVotingPower::default()
            .compute(&committee, 1)
            .unwrap();
        assert_eq!(percent(&roster, 1), Dec::new_with_prec(5, 1));
        assert_eq!(roster.total_percent(), Dec::one());
    }

    #[test]
    fn test_fully_staked_committee() {
        let committee = Committee::new(0, vec![slot(1, Some(1)), slot(2, Some(3))]);
        let roster = StakeWeightedVotingPower::default()
            .compute(&committee, 1)
            .unwrap();
        assert_eq!(percent(&roster, 1), Dec::new_with_prec(25, 2));
        assert_eq!(percent(&roster, 2), Dec::new_with_prec(75, 2));
    }
}
