//! Bincode envelope codec
//!
//! Signing encodes the envelope with an empty signature, signs the
//! keccak-256 digest of those bytes with every sender key (aggregated),
//! stores the signature and encodes again.

use crate::domain::{
    split_aggregate_payload, ConsensusEnvelope, FbftMessage, MessageError, MessageResult,
    SenderIdentity,
};
use crate::ports::{EnvelopeSigner, FbftMessageParser};
use sha3::{Digest, Keccak256};
use shared_types::{BlsPublicKey, BlsSignature, Hash};
use ts_01_signature_aggregation::{
    sign_and_aggregate, verify_aggregate, ParticipationBitmap, SigningKey,
};

/// Default envelope signer and parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeEnvelopeCodec;

impl BincodeEnvelopeCodec {
    pub fn new() -> Self {
        Self
    }

    /// Digest the sender keys sign: keccak-256 of the unsigned encoding.
    pub fn signing_digest(envelope: &ConsensusEnvelope) -> MessageResult<Hash> {
        let mut unsigned = envelope.clone();
        unsigned.signature.clear();
        let bytes = encode(&unsigned)?;
        Ok(Keccak256::digest(&bytes).into())
    }

    /// Decode a signed envelope (frame header already stripped).
    pub fn decode(bytes: &[u8]) -> MessageResult<ConsensusEnvelope> {
        bincode::deserialize(bytes).map_err(|e| MessageError::Parse(e.to_string()))
    }

    /// Check the envelope signature against the given sender keys.
    pub fn verify(envelope: &ConsensusEnvelope, senders: &[BlsPublicKey]) -> bool {
        let Some(signature) = BlsSignature::from_slice(&envelope.signature) else {
            return false;
        };
        match Self::signing_digest(envelope) {
            Ok(digest) => verify_aggregate(&digest, &signature, senders),
            Err(_) => false,
        }
    }
}

fn encode(envelope: &ConsensusEnvelope) -> MessageResult<Vec<u8>> {
    bincode::serialize(envelope).map_err(|e| MessageError::Encode(e.to_string()))
}

impl EnvelopeSigner for BincodeEnvelopeCodec {
    fn sign_and_marshal(
        &self,
        envelope: &mut ConsensusEnvelope,
        keys: &[SigningKey],
    ) -> MessageResult<Vec<u8>> {
        let digest = Self::signing_digest(envelope)?;
        let signature = sign_and_aggregate(&digest, keys)?;
        envelope.signature = signature.as_bytes().to_vec();
        encode(envelope)
    }
}

impl FbftMessageParser for BincodeEnvelopeCodec {
    fn parse(
        &self,
        envelope: &ConsensusEnvelope,
        participants: &[BlsPublicKey],
    ) -> MessageResult<FbftMessage> {
        let request = &envelope.request;

        let (sender_pubkeys, sender_bitmap) = match &request.sender {
            SenderIdentity::PubKey(key) => {
                if !participants.contains(key) {
                    return Err(MessageError::UnknownSender(*key));
                }
                (vec![*key], None)
            }
            SenderIdentity::Bitmap(bytes) => {
                let mask = ParticipationBitmap::from_bytes(participants.to_vec(), bytes)?;
                let keys = mask.enabled_keys();
                if keys.is_empty() {
                    return Err(MessageError::Parse("sender bitmap has no bits set".into()));
                }
                (keys, Some(bytes.clone()))
            }
        };

        let (aggregate_signature, vote_bitmap) = if envelope.message_type.carries_aggregate() {
            let (sig, bitmap) = split_aggregate_payload(&request.payload)?;
            (Some(sig), Some(bitmap))
        } else {
            (None, None)
        };

        Ok(FbftMessage {
            message_type: envelope.message_type,
            view_id: request.view_id,
            block_num: request.block_num,
            shard_id: request.shard_id,
            block_hash: request.block_hash,
            block: request.block.clone(),
            payload: request.payload.clone(),
            sender_pubkeys,
            sender_bitmap,
            aggregate_signature,
            vote_bitmap,
        })
    }
}
