//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that consensus message construction uses
//! - **Outbound (Driven)**: the quorum that holds collected votes

pub mod inbound;
pub mod outbound;
