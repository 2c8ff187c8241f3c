//! Consensus Message Builder - single creation point of wire messages
//!
//! # Flow
//! 1. Fill the request fields from the current round
//! 2. Sender: one key directly, or a bitmap over the quorum for many keys
//! 3. Phase payload (block hash, fresh aggregate, or collected votes)
//! 4. Sign and encode the envelope, then parse it back for bookkeeping

use crate::domain::{
    frame_consensus_message, ConsensusEnvelope, ConsensusRequest, MessageError, MessageResult,
    MessageType, NetworkMessage, PayloadKind, RoundContext, SenderIdentity,
};
use crate::ports::{ConsensusMessageApi, EnvelopeSigner, FbftMessageParser, QuorumDecider};
use parking_lot::RwLock;
use shared_types::{BlsPublicKey, BlsSignature};
use std::sync::Arc;
use ts_01_signature_aggregation::{
    SignatureAggregationApi, SignatureAggregator, SigningKey, VotePhase,
};
use tracing::{debug, error, warn};

/// Builds phase-tagged consensus messages for the current round.
pub struct ConsensusMessageBuilder<Q, S, P>
where
    Q: QuorumDecider,
    S: EnvelopeSigner,
    P: FbftMessageParser,
{
    quorum: Arc<Q>,
    signer: Arc<S>,
    parser: Arc<P>,
    aggregator: SignatureAggregator,
    round: RwLock<RoundContext>,
}

impl<Q, S, P> ConsensusMessageBuilder<Q, S, P>
where
    Q: QuorumDecider,
    S: EnvelopeSigner,
    P: FbftMessageParser,
{
    pub fn new(quorum: Arc<Q>, signer: Arc<S>, parser: Arc<P>, round: RoundContext) -> Self {
        Self {
            quorum,
            signer,
            parser,
            aggregator: SignatureAggregator::new(),
            round: RwLock::new(round),
        }
    }

    /// Move to a new round (new view, block or proposal).
    pub fn update_round(&self, round: RoundContext) {
        *self.round.write() = round;
    }

    pub fn round(&self) -> RoundContext {
        self.round.read().clone()
    }

    fn sender_identity(
        &self,
        participants: &[BlsPublicKey],
        keys: &[SigningKey],
    ) -> MessageResult<SenderIdentity> {
        if let [key] = keys {
            return Ok(SenderIdentity::PubKey(key.public_key()));
        }
        let signing_keys: Vec<BlsPublicKey> = keys.iter().map(SigningKey::public_key).collect();
        let bitmap = self
            .aggregator
            .build_bitmap(participants, &signing_keys)
            .inspect_err(|e| {
                warn!("[ts-02] Unable to setup mask for multi-sig message: {}", e);
            })?;
        Ok(SenderIdentity::Bitmap(bitmap.to_bytes()))
    }

    /// Returns the payload and, for vote-combining phases, the aggregate.
    fn phase_payload(
        &self,
        phase: MessageType,
        round: &RoundContext,
        payload_for_sign: &[u8],
        keys: &[SigningKey],
    ) -> MessageResult<(Vec<u8>, Option<BlsSignature>)> {
        let payload = match phase.payload_kind() {
            PayloadKind::BlockHash => (round.block_hash.to_vec(), None),
            PayloadKind::SignedBlockHash => {
                let sig = self.aggregator.sign_and_aggregate(&round.block_hash, keys)?;
                (sig.as_bytes().to_vec(), None)
            }
            PayloadKind::SignedCommitPayload => {
                let sig = self.aggregator.sign_and_aggregate(payload_for_sign, keys)?;
                (sig.as_bytes().to_vec(), None)
            }
            PayloadKind::AggregatedPrepareVotes => {
                let votes = self
                    .aggregator
                    .aggregate_existing_votes(self.quorum.as_ref(), VotePhase::Prepare)?;
                (votes.to_payload(), Some(votes.signature))
            }
            PayloadKind::AggregatedCommitVotes => {
                let votes = self
                    .aggregator
                    .aggregate_existing_votes(self.quorum.as_ref(), VotePhase::Commit)?;
                (votes.to_payload(), Some(votes.signature))
            }
            PayloadKind::Empty => (Vec::new(), None),
        };
        Ok(payload)
    }
}

impl<Q, S, P> ConsensusMessageApi for ConsensusMessageBuilder<Q, S, P>
where
    Q: QuorumDecider,
    S: EnvelopeSigner,
    P: FbftMessageParser,
{
    fn construct(
        &self,
        phase: MessageType,
        payload_for_sign: &[u8],
        keys: &[SigningKey],
    ) -> MessageResult<NetworkMessage> {
        if keys.is_empty() {
            return Err(MessageError::NoSigners);
        }

        let round = self.round();
        let participants = self.quorum.participants();
        let sender = self.sender_identity(&participants, keys)?;
        let (payload, aggregate) = self.phase_payload(phase, &round, payload_for_sign, keys)?;

        let block = if phase == MessageType::Prepared {
            round.block.clone()
        } else {
            Vec::new()
        };

        let mut envelope = ConsensusEnvelope::new(
            phase,
            ConsensusRequest {
                view_id: round.view_id,
                block_num: round.block_num,
                shard_id: round.shard_id,
                block_hash: round.block_hash,
                sender,
                payload,
                block,
            },
        );

        let marshaled = self
            .signer
            .sign_and_marshal(&mut envelope, keys)
            .inspect_err(|e| {
                error!(%phase, "[ts-02] Failed to sign and marshal consensus message: {}", e);
            })?;

        let fbft = self.parser.parse(&envelope, &participants).inspect_err(|e| {
            error!(%phase, "[ts-02] Failed to deal with the FBFT message: {}", e);
        })?;

        debug!(
            %phase,
            view_id = round.view_id,
            block_num = round.block_num,
            signers = keys.len(),
            bytes = marshaled.len() + 2,
            "[ts-02] Constructed consensus message"
        );

        Ok(NetworkMessage {
            phase,
            bytes: frame_consensus_message(&marshaled),
            fbft,
            optional_aggregate_signature: aggregate,
        })
    }
}
