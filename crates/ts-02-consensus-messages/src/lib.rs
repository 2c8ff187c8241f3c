//! # Consensus Message Subsystem (TS-02)
//!
//! Builds and signs the wire messages of one FBFT round.
//!
//! ## Phases
//!
//! | Phase | Payload |
//! |-------|---------|
//! | `Announce` | proposed block hash |
//! | `Prepare` | aggregate signature over the block hash |
//! | `Prepared` | collected prepare votes: aggregate signature, bitmap; plus the block body |
//! | `Commit` | aggregate signature over the caller's commit payload |
//! | `Committed` | collected commit votes: aggregate signature, bitmap |
//! | `ViewChange`, `NewView` | none |
//!
//! A message signed by one key names its sender directly; a message signed
//! by several keys of the same node carries a sender bitmap over the quorum.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ts_02_consensus_messages::{ConsensusMessageBuilder, ConsensusMessageApi, MessageType};
//!
//! let builder = ConsensusMessageBuilder::new(quorum, codec.clone(), codec, round);
//! let msg = builder.construct(MessageType::Prepare, &[], &keys)?;
//! broadcast(msg.bytes);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::BincodeEnvelopeCodec;
pub use domain::{
    frame_consensus_message, unframe_consensus_message, ConsensusEnvelope, ConsensusRequest,
    FbftMessage, MessageError, MessageResult, MessageType, NetworkMessage, PayloadKind,
    RoundContext, SenderIdentity, ServiceType,
};
pub use ports::{ConsensusMessageApi, EnvelopeSigner, FbftMessageParser, QuorumDecider};
pub use service::ConsensusMessageBuilder;
