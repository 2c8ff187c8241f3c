//! # Availability
//!
//! Resolves commit bitmaps against committees and keeps validators'
//! signed / to-sign counters.

use crate::domain::errors::{RewardError, RewardResult};
use crate::ports::outbound::RewardState;
use shared_types::{Address, BlockHeader, Committee, ShardId, ShardState, Slot};
use std::collections::BTreeSet;
use ts_01_signature_aggregation::{AggregationError, ParticipationBitmap};

/// A committee slot with its position in the committee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSlot {
    pub index: usize,
    pub slot: Slot,
}

/// Split `committee` into signers (payable) and non-signers (missing),
/// both in slot order.
pub fn block_signers(
    bitmap: &[u8],
    committee: &Committee,
) -> Result<(Vec<IndexedSlot>, Vec<IndexedSlot>), AggregationError> {
    let mask = ParticipationBitmap::from_bytes(committee.bls_public_keys(), bitmap)?;

    let (payable, missing): (Vec<IndexedSlot>, Vec<IndexedSlot>) = committee
        .slots
        .iter()
        .enumerate()
        .map(|(index, slot)| IndexedSlot {
            index,
            slot: slot.clone(),
        })
        .partition(|indexed| mask.is_enabled(indexed.index));

    Ok((payable, missing))
}

/// Committee and signer split for a header's last commit.
#[derive(Debug, Clone)]
pub struct BallotResult {
    pub members: Vec<Slot>,
    pub payable: Vec<IndexedSlot>,
    pub missing: Vec<IndexedSlot>,
}

/// Resolve `header.last_commit_bitmap` (which commits `parent`) against
/// the committee of `shard_id` in the parent epoch's shard state.
///
/// Bitmap errors name the parent, the block those signatures commit.
pub fn ballot_result(
    parent: &BlockHeader,
    header: &BlockHeader,
    parent_shard_state: &ShardState,
    shard_id: ShardId,
) -> RewardResult<BallotResult> {
    let committee = parent_shard_state.find_committee_by_id(shard_id)?;
    let (payable, missing) =
        block_signers(&header.last_commit_bitmap, committee).map_err(|source| {
            RewardError::BlockSigners {
                shard_id,
                block_num: parent.number,
                bitmap: hex::encode(&header.last_commit_bitmap),
                source,
            }
        })?;

    Ok(BallotResult {
        members: committee.slots.clone(),
        payable,
        missing,
    })
}

/// Signing-count updates for one ballot: `(validator, signed)` for every
/// staked signer, then every staked absentee. Foundational slots are not
/// tracked.
pub fn signing_count_updates(
    staked: &BTreeSet<Address>,
    payable: &[IndexedSlot],
    missing: &[IndexedSlot],
) -> Vec<(Address, bool)> {
    let signed = payable.iter().map(|signer| (signer.slot.ecdsa_address, true));
    let absent = missing.iter().map(|absent| (absent.slot.ecdsa_address, false));
    signed
        .chain(absent)
        .filter(|(address, _)| staked.contains(address))
        .collect()
}

/// Count one expected signature for every staked member and one actual
/// signature for every staked signer.
pub fn increment_validator_signing_counts(
    staked: &BTreeSet<Address>,
    state: &mut dyn RewardState,
    payable: &[IndexedSlot],
    missing: &[IndexedSlot],
) -> RewardResult<()> {
    for (validator, signed) in signing_count_updates(staked, payable, missing) {
        state.increment_signing_counts(validator, signed)?;
    }
    Ok(())
}
