//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies this subsystem reads from.

use crate::domain::errors::AggregationError;
use crate::domain::votes::{AggregatedVotes, VotePhase};
use shared_types::BlsPublicKey;

/// Quorum/committee source for the current round.
///
/// Implementations must be thread-safe (`Send + Sync`); they are shared
/// between the consensus loop and message construction.
pub trait QuorumVotes: Send + Sync {
    /// Current committee, in authoritative slot order.
    fn participants(&self) -> Vec<BlsPublicKey>;

    /// Combine the individual votes already received for `phase`.
    ///
    /// # Errors
    /// * `EmptyAggregation` if no votes were collected
    fn aggregate_votes(&self, phase: VotePhase) -> Result<AggregatedVotes, AggregationError>;
}
