//! # Signature Aggregation Service
//!
//! Application service implementing `SignatureAggregationApi` by
//! delegating to the domain layer.

use crate::domain::bitmap::{self, ParticipationBitmap};
use crate::domain::bls;
use crate::domain::errors::AggregationError;
use crate::domain::keys::SigningKey;
use crate::domain::votes::{AggregatedVotes, VotePhase};
use crate::ports::inbound::SignatureAggregationApi;
use crate::ports::outbound::QuorumVotes;
use shared_types::{BlsPublicKey, BlsSignature};
use tracing::{debug, warn};

/// Stateless aggregation service.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureAggregator;

impl SignatureAggregator {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureAggregationApi for SignatureAggregator {
    fn build_bitmap(
        &self,
        committee: &[BlsPublicKey],
        signing_keys: &[BlsPublicKey],
    ) -> Result<ParticipationBitmap, AggregationError> {
        bitmap::build_bitmap(committee, signing_keys).inspect_err(|e| {
            warn!(
                committee = committee.len(),
                signers = signing_keys.len(),
                "[ts-01] Cannot build participation bitmap: {}",
                e
            );
        })
    }

    fn sign_and_aggregate(
        &self,
        message: &[u8],
        keys: &[SigningKey],
    ) -> Result<BlsSignature, AggregationError> {
        let signature = bls::sign_and_aggregate(message, keys)?;
        debug!(signers = keys.len(), "[ts-01] Signed and aggregated");
        Ok(signature)
    }

    fn aggregate_existing_votes(
        &self,
        quorum: &dyn QuorumVotes,
        phase: VotePhase,
    ) -> Result<AggregatedVotes, AggregationError> {
        quorum.aggregate_votes(phase)
    }
}
