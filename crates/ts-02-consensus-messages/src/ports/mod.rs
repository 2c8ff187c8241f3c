//! Ports for consensus message construction
//!
//! Hexagonal architecture: the builder is driven through `inbound` and
//! drives the quorum, envelope signer and parser through `outbound`.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
