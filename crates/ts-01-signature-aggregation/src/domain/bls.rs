//! # BLS Aggregation (BLS12-381)
//!
//! Pure domain logic for producing and checking aggregate signatures.
//!
//! ## Notes
//!
//! BLS signatures are used for:
//! - Prepare/commit votes in the FBFT round
//! - The aggregate commit signature embedded in block headers
//!
//! ## Implementation Details
//!
//! - Public keys are on G1 (48 bytes compressed)
//! - Signatures are on G2 (96 bytes compressed)
//!
//! This uses blst's `min_pk` variant. Aggregation is elliptic-curve point
//! addition of the individual signatures.

use super::errors::AggregationError;
use super::keys::SigningKey;
use blst::min_pk::{AggregateSignature, PublicKey, Signature};
use blst::BLST_ERROR;
use shared_types::{BlsPublicKey, BlsSignature};

/// Domain Separation Tag for consensus signatures.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Sign `message` with every key and combine into one aggregate signature.
///
/// # Errors
/// * `EmptyAggregation` if `keys` is empty
/// * `MalformedKey` / `KeyMismatch` if any key cannot sign
pub fn sign_and_aggregate(
    message: &[u8],
    keys: &[SigningKey],
) -> Result<BlsSignature, AggregationError> {
    if keys.is_empty() {
        return Err(AggregationError::EmptyAggregation);
    }

    let signatures = keys
        .iter()
        .map(|key| key.sign(message))
        .collect::<Result<Vec<Signature>, _>>()?;
    let refs: Vec<&Signature> = signatures.iter().collect();

    // Freshly produced signatures are in-group; skip the subgroup check
    let aggregate = AggregateSignature::aggregate(&refs, false)
        .map_err(|e| AggregationError::Blst(format!("aggregate: {:?}", e)))?;

    Ok(BlsSignature(aggregate.to_signature().to_bytes()))
}

/// Aggregate multiple serialized BLS signatures into one.
///
/// # Errors
/// * `EmptyAggregation` if the input list is empty
/// * `InvalidFormat` if any signature cannot be parsed
pub fn aggregate_signatures(
    signatures: &[BlsSignature],
) -> Result<BlsSignature, AggregationError> {
    if signatures.is_empty() {
        return Err(AggregationError::EmptyAggregation);
    }

    let parsed = signatures
        .iter()
        .map(|sig| Signature::from_bytes(&sig.0).map_err(|_| AggregationError::InvalidFormat))
        .collect::<Result<Vec<Signature>, _>>()?;
    let refs: Vec<&Signature> = parsed.iter().collect();

    let aggregate = AggregateSignature::aggregate(&refs, true)
        .map_err(|e| AggregationError::Blst(format!("aggregate: {:?}", e)))?;

    Ok(BlsSignature(aggregate.to_signature().to_bytes()))
}

/// Verify an aggregate signature over one message against its signers.
pub fn verify_aggregate(
    message: &[u8],
    signature: &BlsSignature,
    public_keys: &[BlsPublicKey],
) -> bool {
    if public_keys.is_empty() {
        return false;
    }

    let Ok(sig) = Signature::from_bytes(&signature.0) else {
        return false;
    };

    let pks: Vec<PublicKey> = public_keys
        .iter()
        .filter_map(|pk| PublicKey::from_bytes(&pk.0).ok())
        .collect();

    if pks.len() != public_keys.len() {
        return false; // Some public keys failed to parse
    }

    let pk_refs: Vec<&PublicKey> = pks.iter().collect();
    sig.fast_aggregate_verify(true, message, DST, &pk_refs) == BLST_ERROR::BLST_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_key() -> SigningKey {
        let mut ikm = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut ikm);
        SigningKey::from_ikm(&ikm).unwrap()
    }

    #[test]
    fn test_single_key_signature_verifies() {
        let key = generate_key();
        let sig = sign_and_aggregate(b"block hash", std::slice::from_ref(&key)).unwrap();
        assert!(verify_aggregate(b"block hash", &sig, &[key.public_key()]));
    }

    #[test]
    fn test_aggregate_and_verify() {
        let keys: Vec<SigningKey> = (0..5).map(|_| generate_key()).collect();
        let pks: Vec<BlsPublicKey> = keys.iter().map(|k| k.public_key()).collect();

        let aggregate = sign_and_aggregate(b"aggregate test", &keys).unwrap();
        assert!(verify_aggregate(b"aggregate test", &aggregate, &pks));
        assert!(!verify_aggregate(b"other message", &aggregate, &pks));
        assert!(!verify_aggregate(b"aggregate test", &aggregate, &pks[..4]));
    }

    #[test]
    fn test_sign_then_combine_matches_direct_aggregate() {
        let keys: Vec<SigningKey> = (0..3).map(|_| generate_key()).collect();
        let individual: Vec<BlsSignature> = keys
            .iter()
            .map(|k| sign_and_aggregate(b"vote", std::slice::from_ref(k)).unwrap())
            .collect();

        let combined = aggregate_signatures(&individual).unwrap();
        let direct = sign_and_aggregate(b"vote", &keys).unwrap();
        assert_eq!(combined, direct);
    }

    #[test]
    fn test_empty_inputs_fail() {
        assert!(matches!(
            sign_and_aggregate(b"m", &[]),
            Err(AggregationError::EmptyAggregation)
        ));
        assert!(matches!(
            aggregate_signatures(&[]),
            Err(AggregationError::EmptyAggregation)
        ));
    }

    #[test]
    fn test_malformed_key_fails_whole_aggregate() {
        let good = generate_key();
        let bad = SigningKey::from_parts([0u8; 32], generate_key().public_key());
        assert!(matches!(
            sign_and_aggregate(b"m", &[good, bad]),
            Err(AggregationError::MalformedKey { .. })
        ));
    }

    #[test]
    fn test_garbage_signature_rejected() {
        let garbage = BlsSignature([0xFF; 96]);
        assert!(matches!(
            aggregate_signatures(&[garbage]),
            Err(AggregationError::InvalidFormat)
        ));
    }
}
