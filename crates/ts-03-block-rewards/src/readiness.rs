//! # Commit Signature Readiness
//!
//! The header's commit bitmap may still be collecting votes when
//! settlement starts. The block producer signals once it is final;
//! settlement waits for that signal for a bounded time.

use std::time::Duration;
use tokio::sync::oneshot;

/// Outcome of waiting for the readiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitSigsOutcome {
    Ready,
    /// Producer reported failure, or went away without signalling.
    Failed,
    TimedOut,
}

/// Producer half: reports whether commit signatures were populated.
#[derive(Debug)]
pub struct CommitSigsNotifier {
    sender: oneshot::Sender<bool>,
}

impl CommitSigsNotifier {
    /// Signal readiness. Returns `false` if nobody is waiting any more.
    pub fn notify(self, success: bool) -> bool {
        self.sender.send(success).is_ok()
    }
}

/// Consumer half, handed to settlement.
#[derive(Debug)]
pub struct CommitSigsSignal {
    receiver: oneshot::Receiver<bool>,
}

impl CommitSigsSignal {
    pub fn channel() -> (CommitSigsNotifier, CommitSigsSignal) {
        let (sender, receiver) = oneshot::channel();
        (CommitSigsNotifier { sender }, CommitSigsSignal { receiver })
    }

    /// A signal that has already fired with `success`.
    pub fn resolved(success: bool) -> Self {
        let (notifier, signal) = Self::channel();
        notifier.notify(success);
        signal
    }

    /// Wait up to `timeout` for the producer.
    pub async fn wait(self, timeout: Duration) -> CommitSigsOutcome {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(true)) => CommitSigsOutcome::Ready,
            Ok(Ok(false)) | Ok(Err(_)) => CommitSigsOutcome::Failed,
            Err(_) => CommitSigsOutcome::TimedOut,
        }
    }
}
