//! # Round-to-Reward Flows
//!
//! A committee finishes an FBFT round, the leader's `Committed` message
//! carries the aggregate commit signature and bitmap, the next block
//! embeds them, and settlement pays exactly the committee members that
//! signed.

use super::fixtures::{beacon_chain, header, init_test_logging, TestCommittee, EPOCH};
use proptest::prelude::*;
use shared_types::{
    encode_cross_links, Amount, BlockHeader, CrossLink, ShardId, BEACON_CHAIN_SHARD_ID,
};
use std::sync::Arc;
use std::time::Duration;
use ts_01_signature_aggregation::{
    build_bitmap, verify_aggregate, SignatureAggregationApi, SignatureAggregator, VotePhase,
    VotePool,
};
use ts_02_consensus_messages::{
    unframe_consensus_message, BincodeEnvelopeCodec, ConsensusMessageApi,
    ConsensusMessageBuilder, MessageType, NetworkMessage, RoundContext,
};
use ts_03_block_rewards::domain::schedule::{ONE, STAKED_BLOCKS};
use ts_03_block_rewards::{
    CommitSigsSignal, InMemoryRewardState, RewardAccumulator, RewardConfig, RewardError,
    RewardSettlementApi, StakeWeightedVotingPower,
};

/// Seats 0..3 staked (100, 300, 400); seat 3 foundational.
fn beacon_committee() -> TestCommittee {
    TestCommittee::new(
        BEACON_CHAIN_SHARD_ID,
        1,
        &[Some(100), Some(300), Some(400), None],
    )
}

fn shard_committee(shard_id: ShardId) -> TestCommittee {
    TestCommittee::new(shard_id, 40, &[Some(500), Some(500), None])
}

fn accumulator() -> RewardAccumulator {
    RewardAccumulator::new(
        RewardConfig::for_testing(),
        Arc::new(StakeWeightedVotingPower::default()),
    )
}

/// Run the commit phase of a round over `block` and return the leader's
/// `Committed` message.
fn commit_round(
    members: &TestCommittee,
    block: &BlockHeader,
    voters: &[usize],
) -> NetworkMessage {
    let pool = Arc::new(VotePool::new(members.committee.bls_public_keys()));
    let aggregator = SignatureAggregator::new();
    for voter in members.signers(voters) {
        let vote = aggregator
            .sign_and_aggregate(&block.hash, std::slice::from_ref(&voter))
            .unwrap();
        pool.add_vote(VotePhase::Commit, &voter.public_key(), vote)
            .unwrap();
    }

    let codec = Arc::new(BincodeEnvelopeCodec::new());
    let round = RoundContext::new(block.view_id, block.number, block.shard_id, block.hash);
    let leader = ConsensusMessageBuilder::new(pool, codec.clone(), codec, round);
    leader
        .construct(MessageType::Committed, &[], &members.signers(&[voters[0]]))
        .unwrap()
}

/// Child of `parent` carrying its commit signature and bitmap.
fn child_with_commit(parent: &BlockHeader, committed: &NetworkMessage) -> BlockHeader {
    let mut child = header(parent.number + 1, parent.shard_id, parent.hash);
    child.last_commit_signature = committed.fbft.aggregate_signature;
    child.last_commit_bitmap = committed.fbft.vote_bitmap.clone().unwrap();
    child
}

#[tokio::test]
async fn test_committed_round_pays_beacon_signers() {
    init_test_logging();
    let members = beacon_committee();
    let parent = header(10, BEACON_CHAIN_SHARD_ID, [0; 32]);

    // seat 2 never votes
    let committed = commit_round(&members, &parent, &[0, 1, 3]);
    assert_eq!(committed.fbft.vote_bitmap, Some(vec![0b0000_1011]));
    assert!(unframe_consensus_message(&committed.bytes).is_some());

    let block = child_with_commit(&parent, &committed);
    let signers: Vec<_> = members.signers(&[0, 1, 3]).iter().map(|k| k.public_key()).collect();
    assert!(verify_aggregate(
        &parent.hash,
        &block.last_commit_signature.unwrap(),
        &signers
    ));

    let chain = beacon_chain(&[&members]);
    chain.insert_header(parent);
    chain.set_current_header(block.clone());
    let mut state = InMemoryRewardState::new();

    let settlement = accumulator()
        .accumulate_rewards_and_count_sigs(
            &chain,
            &mut state,
            &block,
            &chain,
            CommitSigsSignal::resolved(true),
        )
        .await
        .unwrap();

    // voting power 0.04 and 0.12 of the signed 0.16; the foundational seat is unpaid
    let paid: Vec<_> = settlement
        .beacon_payouts
        .iter()
        .map(|p| (p.earning_address, p.amount))
        .collect();
    assert_eq!(
        paid,
        vec![(members.address(0), 7 * ONE), (members.address(1), 21 * ONE)]
    );
    assert_eq!(settlement.total_newly_minted, STAKED_BLOCKS);
    assert_eq!(settlement.missing_signers, vec![members.committee.slots[2].clone()]);

    // 10% commission, then 3:1 between operator and outside delegator
    assert_eq!(state.validator_reward(&members.address(0)), 7 * ONE);
    assert_eq!(
        state.delegation_reward(&members.address(0), &[0xDD; 20]),
        1_575_000_000_000_000_000
    );

    let absent = state.signing_counts(&members.address(2));
    assert_eq!((absent.signed, absent.to_sign), (0, 1));
    assert_eq!(state.signing_counts(&members.address(3)).to_sign, 0);
}

#[tokio::test]
async fn test_cross_link_committee_paid_from_shard_round() {
    init_test_logging();
    let beacon = beacon_committee();
    let shard = shard_committee(1);

    let shard_block = header(55, 1, [5; 32]);
    let shard_commit = commit_round(&shard, &shard_block, &[1, 0, 2]);

    let parent = header(10, BEACON_CHAIN_SHARD_ID, [0; 32]);
    let beacon_commit = commit_round(&beacon, &parent, &[0, 1, 2, 3]);
    let mut block = child_with_commit(&parent, &beacon_commit);
    block.cross_links = encode_cross_links(&[CrossLink {
        epoch: EPOCH,
        shard_id: 1,
        block_num: shard_block.number,
        block_hash: shard_block.hash,
        signer_bitmap: shard_commit.fbft.vote_bitmap.clone().unwrap(),
    }])
    .unwrap();

    let chain = beacon_chain(&[&beacon, &shard]);
    chain.insert_header(parent);
    chain.set_current_header(block.clone());
    let mut state = InMemoryRewardState::new();

    let settlement = accumulator()
        .accumulate_rewards_and_count_sigs(
            &chain,
            &mut state,
            &block,
            &chain,
            CommitSigsSignal::resolved(true),
        )
        .await
        .unwrap();

    // committee order, regardless of vote arrival order
    let shard_paid: Vec<_> = settlement
        .shard_payouts
        .iter()
        .map(|p| (p.shard_id, p.earning_address, p.amount))
        .collect();
    assert_eq!(
        shard_paid,
        vec![
            (1, shard.address(0), 14 * ONE),
            (1, shard.address(1), 14 * ONE)
        ]
    );
    assert_eq!(settlement.beacon_payouts.len(), 3);
    assert!(settlement.missing_signers.is_empty());
    assert_eq!(settlement.total_newly_minted, settlement.total_payout());
}

#[tokio::test(start_paused = true)]
async fn test_settlement_waits_for_late_commit_sigs() {
    init_test_logging();
    let members = beacon_committee();
    let parent = header(10, BEACON_CHAIN_SHARD_ID, [0; 32]);
    let committed = commit_round(&members, &parent, &[0, 1]);
    let block = child_with_commit(&parent, &committed);

    let chain = beacon_chain(&[&members]);
    chain.insert_header(parent);
    chain.set_current_header(block.clone());
    let mut state = InMemoryRewardState::new();

    let (notifier, signal) = CommitSigsSignal::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        notifier.notify(true);
    });

    let settlement = accumulator()
        .accumulate_rewards_and_count_sigs(&chain, &mut state, &block, &chain, signal)
        .await
        .unwrap();
    assert_eq!(settlement.beacon_payouts.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_commit_sigs_never_ready_mutates_nothing() {
    init_test_logging();
    let members = beacon_committee();
    let parent = header(10, BEACON_CHAIN_SHARD_ID, [0; 32]);
    let committed = commit_round(&members, &parent, &[0, 1, 2]);
    let block = child_with_commit(&parent, &committed);

    let chain = beacon_chain(&[&members]);
    chain.insert_header(parent);
    chain.set_current_header(block.clone());
    let mut state = InMemoryRewardState::new();

    let (notifier, signal) = CommitSigsSignal::channel();
    tokio::spawn(async move {
        // later than the 100ms testing timeout
        tokio::time::sleep(Duration::from_secs(1)).await;
        notifier.notify(true);
    });

    let err = accumulator()
        .accumulate_rewards_and_count_sigs(&chain, &mut state, &block, &chain, signal)
        .await
        .unwrap_err();
    assert!(matches!(err, RewardError::CommitSigsTimeout { .. }));
    assert!(state.is_untouched());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_only_staked_signers_are_paid(picks in proptest::collection::vec(any::<bool>(), 4)) {
        let members = beacon_committee();
        let keys = members.committee.bls_public_keys();
        let signed: Vec<usize> = (0..4).filter(|i| picks[*i]).collect();
        let signer_keys: Vec<_> = signed.iter().map(|i| keys[*i]).collect();

        let parent = header(10, BEACON_CHAIN_SHARD_ID, [0; 32]);
        let mut block = header(11, BEACON_CHAIN_SHARD_ID, parent.hash);
        block.last_commit_bitmap = build_bitmap(&keys, &signer_keys).unwrap().to_bytes();

        let chain = beacon_chain(&[&members]);
        chain.insert_header(parent);
        chain.set_current_header(block.clone());
        let mut state = InMemoryRewardState::new();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let settlement = runtime
            .block_on(accumulator().accumulate_rewards_and_count_sigs(
                &chain,
                &mut state,
                &block,
                &chain,
                CommitSigsSignal::resolved(true),
            ))
            .unwrap();

        for payout in &settlement.beacon_payouts {
            let seat = members
                .committee
                .slots
                .iter()
                .position(|s| s.ecdsa_address == payout.earning_address)
                .unwrap();
            prop_assert!(signed.contains(&seat));
            prop_assert!(members.committee.slots[seat].effective_stake.is_some());
        }
        prop_assert_eq!(
            settlement.missing_signers.len() + signed.len(),
            members.committee.len()
        );
        // half-to-even rounding of each part can overshoot by at most one unit per part
        let paid: Amount = settlement.total_payout();
        prop_assert!(paid <= STAKED_BLOCKS + settlement.beacon_payouts.len() as Amount);
    }
}
