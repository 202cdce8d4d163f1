use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationOutcome {
    Known(f64),
    /// Nothing arrived within the wait.
    TimedOut,
    /// The sender was dropped without resolving.
    Cancelled,
    /// A value arrived but is not a usable track length.
    Invalid(f64),
}

impl DurationOutcome {
    pub fn seconds(self) -> Option<f64> {
        match self {
            DurationOutcome::Known(seconds) => Some(seconds),
            _ => None,
        }
    }
}

/// Producer half, held by whatever loads the audio metadata.
pub struct DurationSender(Sender<f64>);

impl DurationSender {
    /// Publishes the track length. Consumes the sender: a request resolves once.
    pub fn resolve(self, seconds: f64) {
        let _ = self.0.send(seconds);
    }
}

/// Pending track duration that a session waits on for a bounded time.
pub struct DurationRequest(Receiver<f64>);

pub fn duration_channel() -> (DurationSender, DurationRequest) {
    let (tx, rx) = bounded(1);
    (DurationSender(tx), DurationRequest(rx))
}

impl DurationRequest {
    /// Request that is already resolved.
    pub fn ready(seconds: f64) -> Self {
        let (tx, rx) = duration_channel();
        tx.resolve(seconds);
        rx
    }

    /// Request whose producer is gone; waiting on it returns at once.
    pub fn unavailable() -> Self {
        let (tx, rx) = duration_channel();
        drop(tx);
        rx
    }

    pub fn wait(&self, timeout: Duration) -> DurationOutcome {
        match self.0.recv_timeout(timeout) {
            Ok(seconds) if seconds.is_finite() && seconds > 0.0 => DurationOutcome::Known(seconds),
            Ok(seconds) => DurationOutcome::Invalid(seconds),
            Err(RecvTimeoutError::Timeout) => DurationOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => DurationOutcome::Cancelled,
        }
    }
}
