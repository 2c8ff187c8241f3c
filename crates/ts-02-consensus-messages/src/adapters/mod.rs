//! Adapters for consensus message construction
//!
//! - codec: bincode envelope encoding with keccak-256 envelope signatures

pub mod codec;

pub use codec::BincodeEnvelopeCodec;
