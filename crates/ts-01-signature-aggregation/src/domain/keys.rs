//! # Signing Keys
//!
//! A BLS secret key paired with the public key it claims to derive. The
//! pairing is checked on every signature so malformed key material is a
//! `SigningError`, never a silently skipped vote.

use super::bls::DST;
use super::errors::AggregationError;
use blst::min_pk::{SecretKey, Signature};
use shared_types::BlsPublicKey;
use std::fmt;
use zeroize::Zeroizing;

/// BLS private key wrapper.
#[derive(Clone)]
pub struct SigningKey {
    secret: Zeroizing<[u8; 32]>,
    public: BlsPublicKey,
}

impl SigningKey {
    /// Derive a key pair from at least 32 bytes of input keying material.
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, AggregationError> {
        let sk = SecretKey::key_gen(ikm, &[])
            .map_err(|e| AggregationError::Blst(format!("key_gen: {:?}", e)))?;
        Ok(Self {
            secret: Zeroizing::new(sk.to_bytes()),
            public: BlsPublicKey(sk.sk_to_pk().to_bytes()),
        })
    }

    /// Pair raw secret bytes with a public key. Validated lazily on sign.
    pub fn from_parts(secret: [u8; 32], public: BlsPublicKey) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            public,
        }
    }

    pub fn public_key(&self) -> BlsPublicKey {
        self.public
    }

    /// Sign `message` under the consensus DST.
    pub(crate) fn sign(&self, message: &[u8]) -> Result<Signature, AggregationError> {
        let sk = SecretKey::from_bytes(self.secret.as_ref()).map_err(|_| {
            AggregationError::MalformedKey {
                key: self.public.to_hex(),
            }
        })?;
        if sk.sk_to_pk().to_bytes() != self.public.0 {
            return Err(AggregationError::KeyMismatch {
                key: self.public.to_hex(),
            });
        }
        Ok(sk.sign(message, DST, &[]))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ikm_is_deterministic() {
        let a = SigningKey::from_ikm(&[7u8; 32]).unwrap();
        let b = SigningKey::from_ikm(&[7u8; 32]).unwrap();
        assert_eq!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_short_ikm_rejected() {
        assert!(matches!(
            SigningKey::from_ikm(&[1u8; 8]),
            Err(AggregationError::Blst(_))
        ));
    }

    #[test]
    fn test_zero_secret_is_malformed() {
        let real = SigningKey::from_ikm(&[3u8; 32]).unwrap();
        let broken = SigningKey::from_parts([0u8; 32], real.public_key());
        assert!(matches!(
            broken.sign(b"msg"),
            Err(AggregationError::MalformedKey { .. })
        ));
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let a = SigningKey::from_ikm(&[1u8; 32]).unwrap();
        let b = SigningKey::from_ikm(&[2u8; 32]).unwrap();
        let secret = *a.secret;
        let crossed = SigningKey::from_parts(secret, b.public_key());
        assert!(matches!(
            crossed.sign(b"msg"),
            Err(AggregationError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = SigningKey::from_ikm(&[5u8; 32]).unwrap();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("public"));
        assert!(!rendered.contains("secret"));
    }
}
