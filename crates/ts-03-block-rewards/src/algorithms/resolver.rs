//! # Committee Reward Resolver
//!
//! Turns a committee's signer bitmap into payable/missing slots and
//! splits a block reward among the payable signers in proportion to
//! their voting power.
//!
//! ## Proportional share
//!
//! For each paid signer `due = reward * percent / Σ percent`, where the
//! sum runs over payable non-foundational signers. Foundational and
//! zero-share signers get nothing. Cross-link committees truncate the
//! due amount; the beacon committee rounds it.
//!
//! The ratio is evaluated exactly in integer arithmetic and rounded once,
//! so truncated dues never sum past the reward.

use super::availability::{block_signers, IndexedSlot};
use crate::domain::cache::VotingPowerCache;
use crate::domain::errors::{RewardError, RewardResult};
use crate::domain::roster::{Voter, VotingRoster};
use primitive_types::U512;
use shared_types::{Amount, Committee, Dec, Epoch};
use std::cmp::Ordering;
use std::sync::Arc;

/// How a fractional due amount becomes whole atto units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareRounding {
    /// Floor; used for cross-link (shard) committees.
    Truncate,
    /// Half-to-even; used for the beacon committee.
    Round,
}

impl ShareRounding {
    /// `reward * numerator / denominator` in whole atto units, computed
    /// exactly before rounding. `None` if `denominator` is zero.
    pub fn scaled_share(self, reward: Amount, numerator: Dec, denominator: Dec) -> Option<Amount> {
        if denominator.is_zero() {
            return None;
        }
        let den = U512::from(denominator.raw());
        let (quo, rem) = (U512::from(reward) * U512::from(numerator.raw())).div_mod(den);
        let rounded = match self {
            Self::Truncate => quo,
            Self::Round => match (rem * U512::from(2u8)).cmp(&den) {
                Ordering::Less => quo,
                Ordering::Greater => quo + U512::one(),
                Ordering::Equal if (quo % U512::from(2u8)).is_zero() => quo,
                Ordering::Equal => quo + U512::one(),
            },
        };
        (rounded.bits() <= 128).then(|| rounded.low_u128())
    }
}

/// A payable signer and the amount it is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerDue {
    pub signer: IndexedSlot,
    pub voter: Voter,
    pub due: Amount,
}

/// Per-committee payable resolution backed by the voting power cache.
pub struct CommitteeRewardResolver {
    voting_power: Arc<VotingPowerCache>,
}

impl CommitteeRewardResolver {
    pub fn new(voting_power: Arc<VotingPowerCache>) -> Self {
        Self { voting_power }
    }

    /// Payable and missing slots for `bitmap` over `committee`.
    ///
    /// # Errors
    /// * `BlockSigners` if the bitmap does not fit the committee
    pub fn resolve_signers(
        &self,
        bitmap: &[u8],
        committee: &Committee,
        block_num: u64,
    ) -> RewardResult<(Vec<IndexedSlot>, Vec<IndexedSlot>)> {
        block_signers(bitmap, committee).map_err(|source| RewardError::BlockSigners {
            shard_id: committee.shard_id,
            block_num,
            bitmap: hex::encode(bitmap),
            source,
        })
    }

    pub fn roster(&self, epoch: Epoch, committee: &Committee) -> RewardResult<Arc<VotingRoster>> {
        self.voting_power.lookup(epoch, committee)
    }

    /// Split `reward` among `payable` by voting power at `epoch`.
    pub fn signer_dues(
        &self,
        epoch: Epoch,
        committee: &Committee,
        payable: &[IndexedSlot],
        reward: Amount,
        rounding: ShareRounding,
    ) -> RewardResult<Vec<SignerDue>> {
        let roster = self.roster(epoch, committee)?;
        proportional_dues(reward, &roster, payable, rounding)
    }
}

fn voter_for<'a>(roster: &'a VotingRoster, signer: &IndexedSlot) -> RewardResult<&'a Voter> {
    roster
        .voter(&signer.slot.bls_public_key)
        .ok_or(RewardError::MissingVoter {
            key: signer.slot.bls_public_key,
            epoch: roster.epoch,
            shard_id: roster.shard_id,
        })
}

/// Σ overall percent of payable non-foundational signers.
pub fn total_signer_share(roster: &VotingRoster, payable: &[IndexedSlot]) -> RewardResult<Dec> {
    let mut total = Dec::zero();
    for signer in payable {
        let voter = voter_for(roster, signer)?;
        if !voter.is_foundational {
            total = total.add(voter.overall_percent);
        }
    }
    Ok(total)
}

/// Dues for every paid signer, in `payable` order.
pub fn proportional_dues(
    reward: Amount,
    roster: &VotingRoster,
    payable: &[IndexedSlot],
    rounding: ShareRounding,
) -> RewardResult<Vec<SignerDue>> {
    let total = total_signer_share(roster, payable)?;

    let mut dues = Vec::with_capacity(payable.len());
    for signer in payable {
        let voter = voter_for(roster, signer)?;
        if voter.is_foundational || voter.overall_percent.is_zero() {
            continue;
        }
        // total >= this voter's non-zero percent, so the share is at most reward
        let Some(due) = rounding.scaled_share(reward, voter.overall_percent, total) else {
            continue;
        };
        dues.push(SignerDue {
            signer: signer.clone(),
            voter: voter.clone(),
            due,
        });
    }
    Ok(dues)
}
