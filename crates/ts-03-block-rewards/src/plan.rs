//! # Settlement Plan
//!
//! Every state write of one settlement, resolved before the first one is
//! applied. Chain reads, bitmap decoding, voting power and dues all happen
//! while the plan is built, so a failure there leaves `RewardState`
//! untouched.

use crate::algorithms::{signing_count_updates, IndexedSlot};
use crate::domain::errors::RewardResult;
use crate::domain::snapshot::{DelegatorShares, ValidatorSnapshot};
use crate::ports::outbound::RewardState;
use shared_types::{Address, Amount};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One pending write.
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
    SigningCount {
        validator: Address,
        signed: bool,
    },
    Reward {
        snapshot: ValidatorSnapshot,
        shares: Arc<DelegatorShares>,
        amount: Amount,
    },
    Balance {
        address: Address,
        amount: Amount,
    },
}

/// Ordered writes of one settlement.
#[derive(Debug, Default)]
pub(crate) struct SettlementPlan {
    mutations: Vec<Mutation>,
}

impl SettlementPlan {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count_signatures(
        &mut self,
        staked: &BTreeSet<Address>,
        payable: &[IndexedSlot],
        missing: &[IndexedSlot],
    ) {
        self.mutations.extend(
            signing_count_updates(staked, payable, missing)
                .into_iter()
                .map(|(validator, signed)| Mutation::SigningCount { validator, signed }),
        );
    }

    pub(crate) fn add_reward(
        &mut self,
        snapshot: ValidatorSnapshot,
        shares: Arc<DelegatorShares>,
        amount: Amount,
    ) {
        self.mutations.push(Mutation::Reward {
            snapshot,
            shares,
            amount,
        });
    }

    pub(crate) fn add_balance(&mut self, address: Address, amount: Amount) {
        self.mutations.push(Mutation::Balance { address, amount });
    }

    pub(crate) fn len(&self) -> usize {
        self.mutations.len()
    }

    /// Apply every write in order.
    pub(crate) fn apply(self, state: &mut dyn RewardState) -> RewardResult<()> {
        for mutation in self.mutations {
            match mutation {
                Mutation::SigningCount { validator, signed } => {
                    state.increment_signing_counts(validator, signed)?
                }
                Mutation::Reward {
                    snapshot,
                    shares,
                    amount,
                } => state.add_reward(&snapshot, amount, &shares)?,
                Mutation::Balance { address, amount } => state.add_balance(address, amount)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRewardState;
    use crate::domain::snapshot::Delegation;
    use shared_types::{BlsPublicKey, Dec, Slot};

    fn indexed(index: usize, i: u8) -> IndexedSlot {
        IndexedSlot {
            index,
            slot: Slot {
                bls_public_key: BlsPublicKey([i; 48]),
                ecdsa_address: [i; 20],
                effective_stake: Some(Dec::from_int(1000)),
            },
        }
    }

    #[test]
    fn test_nothing_written_until_applied() {
        let mut plan = SettlementPlan::new();
        let staked: BTreeSet<Address> = [[1u8; 20], [2u8; 20]].into_iter().collect();
        plan.count_signatures(&staked, &[indexed(0, 1)], &[indexed(1, 2)]);
        plan.add_reward(
            ValidatorSnapshot {
                epoch: 1,
                address: [1; 20],
                commission_rate: Dec::zero(),
                delegations: vec![Delegation {
                    delegator_address: [1; 20],
                    amount: 10,
                }],
            },
            Arc::new(DelegatorShares::new()),
            40,
        );
        plan.add_balance([3; 20], 5);
        assert_eq!(plan.len(), 4);

        let mut state = InMemoryRewardState::new();
        assert!(state.is_untouched());
        plan.apply(&mut state).unwrap();

        assert_eq!(state.signing_counts(&[1; 20]).signed, 1);
        assert_eq!(state.signing_counts(&[2; 20]).to_sign, 1);
        assert_eq!(state.validator_reward(&[1; 20]), 40);
        assert_eq!(state.balance(&[3; 20]), 5);
    }
}
