//! # Domain Layer
//!
//! Pure cryptographic logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod bitmap;
pub mod bls;
pub mod errors;
pub mod keys;
pub mod votes;
