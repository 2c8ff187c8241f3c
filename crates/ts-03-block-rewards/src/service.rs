//! # Reward Accumulator Service
//!
//! Settles the block reward of one header and counts validator signatures.
//!
//! ## Flow
//!
//! 1. Wait for the commit signatures (bounded); nothing is touched before
//! 2. Genesis, or a staking-era node not on the beacon chain: empty settlement
//! 3. Staking era on the beacon chain: pay every cross-link committee, then
//!    the beacon committee, by voting power
//! 4. Pre-staking era: split a flat reward evenly among the parent's signers
//!
//! Steps 3 and 4 only build a plan of state writes. The plan is applied
//! once the whole settlement has resolved, so a failed lookup or a bad
//! bitmap leaves `RewardState` as it was.

use crate::algorithms::{
    ballot_result, flat_split, BallotResult, CommitteeRewardResolver, ShareRounding, SignerDue,
};
use crate::config::RewardConfig;
use crate::domain::cache::{DelegatorShareCache, VotingPowerCache};
use crate::domain::errors::{RewardError, RewardResult};
use crate::domain::payout::{PayoutRecord, RewardSettlement};
use crate::domain::schedule::{BlockRewardPolicy, FlatRateSchedule};
use crate::ports::inbound::RewardSettlementApi;
use crate::plan::SettlementPlan;
use crate::ports::outbound::{ChainReader, RewardState, VotingPowerComputer};
use crate::readiness::{CommitSigsOutcome, CommitSigsSignal};
use async_trait::async_trait;
use shared_types::{
    Address, Amount, BlockHeader, ChainError, Committee, ShardId, Slot, BEACON_CHAIN_SHARD_ID,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Block reward settlement service.
pub struct RewardAccumulator {
    config: RewardConfig,
    policy: Arc<dyn BlockRewardPolicy>,
    voting_power: Arc<VotingPowerCache>,
    delegator_shares: Arc<DelegatorShareCache>,
    resolver: CommitteeRewardResolver,
}

impl RewardAccumulator {
    /// Create with the flat-rate schedule and fresh caches.
    pub fn new(config: RewardConfig, computer: Arc<dyn VotingPowerComputer>) -> Self {
        let voting_power = Arc::new(VotingPowerCache::new(
            config.voting_power_cache_capacity,
            computer,
        ));
        let delegator_shares = Arc::new(DelegatorShareCache::new(
            config.delegator_share_cache_capacity,
        ));
        Self::with_caches(config, voting_power, delegator_shares)
    }

    /// Create over caches shared with other settlement instances.
    pub fn with_caches(
        config: RewardConfig,
        voting_power: Arc<VotingPowerCache>,
        delegator_shares: Arc<DelegatorShareCache>,
    ) -> Self {
        Self {
            config,
            policy: Arc::new(FlatRateSchedule),
            resolver: CommitteeRewardResolver::new(voting_power.clone()),
            voting_power,
            delegator_shares,
        }
    }

    /// Replace the staked reward schedule.
    pub fn with_policy(mut self, policy: Arc<dyn BlockRewardPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Timeout and cache sizing this accumulator was built with.
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Voting roster cache, shared with the committee resolver.
    pub fn voting_power(&self) -> &Arc<VotingPowerCache> {
        &self.voting_power
    }

    /// Delegator share cache consulted on every credit.
    pub fn delegator_shares(&self) -> &Arc<DelegatorShareCache> {
        &self.delegator_shares
    }

    async fn wait_for_commit_sigs(&self, sigs_ready: CommitSigsSignal) -> RewardResult<()> {
        let timeout = self.config.commit_sigs_timeout;
        match sigs_ready.wait(timeout).await {
            CommitSigsOutcome::Ready => {
                info!("[ts-03] Commit sigs are ready");
                Ok(())
            }
            CommitSigsOutcome::Failed => Err(RewardError::CommitSigsFailed),
            CommitSigsOutcome::TimedOut => Err(RewardError::CommitSigsTimeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Staking era on the beacon chain.
    async fn settle_staking(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        header: &BlockHeader,
        beacon_chain: &dyn ChainReader,
    ) -> RewardResult<RewardSettlement> {
        let signed_reward = self.policy.staked_block_reward(chain.config(), header);
        // a negative reward is an economic outcome, not a failure
        let Ok(reward) = Amount::try_from(signed_reward) else {
            info!(
                block_num = header.number,
                reward = signed_reward,
                "[ts-03] Negative block reward, nothing to settle"
            );
            return Ok(RewardSettlement::empty());
        };

        let shard_payouts = self.settle_cross_links(chain, plan, header, reward).await?;
        let (beacon_payouts, missing) = self
            .settle_beacon_committee(chain, plan, header, beacon_chain, reward)
            .await?;

        let total = beacon_payouts
            .iter()
            .chain(shard_payouts.iter())
            .try_fold(0, |acc: Amount, p| acc.checked_add(p.amount))
            .ok_or_else(|| ChainError::State("newly minted total overflows".into()))?;

        Ok(RewardSettlement::staking(
            total,
            missing,
            beacon_payouts,
            shard_payouts,
        ))
    }

    /// Pay the shard committees attested by the header's cross-links, in
    /// header order and, within a link, in committee order.
    async fn settle_cross_links(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        header: &BlockHeader,
        reward: Amount,
    ) -> RewardResult<Vec<PayoutRecord>> {
        if header.cross_links.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let cross_links = header.cross_links()?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            count = cross_links.len(),
            "[ts-03] Decode cross-links"
        );

        let started = Instant::now();
        let mut buckets: Vec<(ShardId, Vec<SignerDue>)> = Vec::with_capacity(cross_links.len());
        for link in &cross_links {
            if !chain.config().is_staking(link.epoch) {
                continue;
            }

            let stage = Instant::now();
            let shard_state = chain.read_shard_state(link.epoch).await?;
            debug!(
                elapsed_ms = stage.elapsed().as_millis() as u64,
                epoch = link.epoch,
                "[ts-03] Shard chain reward (read shard state)"
            );
            let committee = shard_state.find_committee_by_id(link.shard_id)?;

            let stage = Instant::now();
            let (payable, missing) =
                self.resolver
                    .resolve_signers(&link.signer_bitmap, committee, link.block_num)?;
            debug!(
                elapsed_ms = stage.elapsed().as_millis() as u64,
                shard_id = link.shard_id,
                block_num = link.block_num,
                "[ts-03] Shard chain reward (block signers)"
            );

            plan.count_signatures(&committee.staked_validators(), &payable, &missing);

            let stage = Instant::now();
            let mut dues = self.resolver.signer_dues(
                link.epoch,
                committee,
                &payable,
                reward,
                ShareRounding::Truncate,
            )?;
            debug!(
                elapsed_ms = stage.elapsed().as_millis() as u64,
                "[ts-03] Shard chain reward (voting power)"
            );

            dues.sort_by_key(|due| due.signer.index);
            buckets.push((link.shard_id, dues));
        }

        let stage = Instant::now();
        let mut payouts = Vec::new();
        for (shard_id, dues) in buckets {
            for due in dues {
                let address = due.signer.slot.ecdsa_address;
                self.credit(chain, plan, &address, due.due).await?;
                payouts.push(PayoutRecord {
                    shard_id,
                    earning_address: address,
                    amount: due.due,
                    earning_key: due.signer.slot.bls_public_key,
                });
            }
        }
        debug!(
            elapsed_ms = stage.elapsed().as_millis() as u64,
            "[ts-03] Shard chain reward (add reward)"
        );
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            payables = payouts.len(),
            "[ts-03] Shard chain reward"
        );
        Ok(payouts)
    }

    /// Pay this beacon block's own committee for committing the parent.
    async fn settle_beacon_committee(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        header: &BlockHeader,
        beacon_chain: &dyn ChainReader,
        reward: Amount,
    ) -> RewardResult<(Vec<PayoutRecord>, Vec<Slot>)> {
        let started = Instant::now();
        let parent = beacon_chain
            .header_by_hash(&header.parent_hash)
            .await?
            .ok_or_else(|| ChainError::HeaderNotFound(hex::encode(header.parent_hash)))?;
        let parent_state = beacon_chain.read_shard_state(parent.epoch).await?;
        let BallotResult {
            members,
            payable,
            missing,
        } = ballot_result(&parent, header, &parent_state, BEACON_CHAIN_SHARD_ID)?;
        let committee = Committee::new(BEACON_CHAIN_SHARD_ID, members);

        plan.count_signatures(&committee.staked_validators(), &payable, &missing);

        let dues = self.resolver.signer_dues(
            parent.epoch,
            &committee,
            &payable,
            reward,
            ShareRounding::Round,
        )?;

        let mut payouts = Vec::with_capacity(dues.len());
        for due in dues {
            let address = due.voter.earning_account;
            self.credit(chain, plan, &address, due.due).await?;
            payouts.push(PayoutRecord {
                shard_id: BEACON_CHAIN_SHARD_ID,
                earning_address: address,
                amount: due.due,
                earning_key: due.voter.identity,
            });
        }
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            payables = payouts.len(),
            "[ts-03] Beacon chain reward"
        );

        Ok((payouts, missing.into_iter().map(|m| m.slot).collect()))
    }

    /// Plan a credit of `amount` to the validator at `address` and its
    /// delegators.
    async fn credit(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        address: &Address,
        amount: Amount,
    ) -> RewardResult<()> {
        let snapshot = chain.read_validator_snapshot(address).await?;
        let shares = self.delegator_shares.lookup(&snapshot)?;
        plan.add_reward(snapshot, shares, amount);
        Ok(())
    }

    /// Pre-staking era: flat reward over the signers of the header's shard.
    async fn settle_pre_staking(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        header: &BlockHeader,
    ) -> RewardResult<RewardSettlement> {
        let parent = chain
            .header_by_hash(&header.parent_hash)
            .await?
            .ok_or_else(|| ChainError::HeaderNotFound(hex::encode(header.parent_hash)))?;
        if parent.is_genesis() {
            // epoch block, not signed in the usual manner
            return Ok(RewardSettlement::empty());
        }

        let parent_state = chain.read_shard_state(parent.epoch).await?;
        let ballot = ballot_result(&parent, header, &parent_state, header.shard_id)?;

        let reward = self.policy.pre_staked_block_reward();
        let amounts = flat_split(reward, ballot.payable.len());
        let mut paid: Amount = 0;
        for (signer, amount) in ballot.payable.iter().zip(amounts) {
            plan.add_balance(signer.slot.ecdsa_address, amount);
            paid = paid.saturating_add(amount);
        }

        if paid != reward {
            error!(
                block_reward = reward,
                total_paid_out = paid,
                block_num = header.number,
                "[ts-03] Total paid out was not equal to block reward"
            );
            return Err(RewardError::PayoutMismatch {
                expected: reward,
                paid,
            });
        }

        Ok(RewardSettlement::pre_staking(paid))
    }

    async fn plan_settlement(
        &self,
        chain: &dyn ChainReader,
        plan: &mut SettlementPlan,
        header: &BlockHeader,
        beacon_chain: &dyn ChainReader,
    ) -> RewardResult<RewardSettlement> {
        if chain.config().is_staking(header.epoch) {
            // shard chains do not mint; their committees are paid via cross-links
            if chain.current_header().await?.shard_id != BEACON_CHAIN_SHARD_ID {
                return Ok(RewardSettlement::empty());
            }
            return self
                .settle_staking(chain, plan, header, beacon_chain)
                .await;
        }

        self.settle_pre_staking(chain, plan, header).await
    }
}

#[async_trait]
impl RewardSettlementApi for RewardAccumulator {
    async fn accumulate_rewards_and_count_sigs(
        &self,
        chain: &dyn ChainReader,
        state: &mut dyn RewardState,
        header: &BlockHeader,
        beacon_chain: &dyn ChainReader,
        sigs_ready: CommitSigsSignal,
    ) -> RewardResult<RewardSettlement> {
        self.wait_for_commit_sigs(sigs_ready).await?;

        if header.is_genesis() {
            return Ok(RewardSettlement::empty());
        }

        // nothing is written unless the whole settlement resolves
        let mut plan = SettlementPlan::new();
        let settlement = self
            .plan_settlement(chain, &mut plan, header, beacon_chain)
            .await?;
        debug!(
            block_num = header.number,
            writes = plan.len(),
            "[ts-03] Applying settlement"
        );
        plan.apply(state)?;
        Ok(settlement)
    }
}
