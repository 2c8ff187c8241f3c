//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::bitmap::ParticipationBitmap;
use crate::domain::errors::AggregationError;
use crate::domain::keys::SigningKey;
use crate::domain::votes::{AggregatedVotes, VotePhase};
use crate::ports::outbound::QuorumVotes;
use shared_types::{BlsPublicKey, BlsSignature};

/// Signature aggregation API.
///
/// Stateless: every call is a pure function of its arguments (and, for
/// `aggregate_existing_votes`, of the quorum's collected votes).
pub trait SignatureAggregationApi: Send + Sync {
    /// Bitmap over `committee` with every signing key set.
    ///
    /// # Errors
    /// * `NotInCommittee` if a signing key is not a committee member
    fn build_bitmap(
        &self,
        committee: &[BlsPublicKey],
        signing_keys: &[BlsPublicKey],
    ) -> Result<ParticipationBitmap, AggregationError>;

    /// Sign `message` with every key and combine the signatures.
    fn sign_and_aggregate(
        &self,
        message: &[u8],
        keys: &[SigningKey],
    ) -> Result<BlsSignature, AggregationError>;

    /// Combine votes previously collected by `quorum` for `phase`.
    ///
    /// Read-only over the quorum; never signs anything.
    fn aggregate_existing_votes(
        &self,
        quorum: &dyn QuorumVotes,
        phase: VotePhase,
    ) -> Result<AggregatedVotes, AggregationError>;
}
