//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::RewardResult;
use crate::domain::payout::RewardSettlement;
use crate::ports::outbound::{ChainReader, RewardState};
use crate::readiness::CommitSigsSignal;
use async_trait::async_trait;
use shared_types::BlockHeader;

/// Block reward settlement API.
#[async_trait]
pub trait RewardSettlementApi: Send + Sync {
    /// Credit the block reward for `header` and count validator signatures.
    ///
    /// Waits for `sigs_ready` before reading the header's commit bitmap.
    /// Nothing is mutated if the wait fails or times out.
    async fn accumulate_rewards_and_count_sigs(
        &self,
        chain: &dyn ChainReader,
        state: &mut dyn RewardState,
        header: &BlockHeader,
        beacon_chain: &dyn ChainReader,
        sigs_ready: CommitSigsSignal,
    ) -> RewardResult<RewardSettlement>;
}
