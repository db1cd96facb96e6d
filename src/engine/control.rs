// * Run control signals passed as messages from any number of handles to the single run.
// * Stop is sticky once observed; skip is consumed by the poll that sees it.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Abandon the remaining URLs of the current source
    SkipSource,
    /// Abandon the run at the next check point
    Stop,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("Run has already finished")]
    RunFinished,
}

/// Sender side, cheap to clone and safe to use from any task
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: UnboundedSender<ControlSignal>,
}

impl ControlHandle {
    pub fn skip_source(&self) -> Result<(), ControlError> {
        self.send(ControlSignal::SkipSource)
    }

    pub fn stop(&self) -> Result<(), ControlError> {
        self.send(ControlSignal::Stop)
    }

    pub fn send(&self, signal: ControlSignal) -> Result<(), ControlError> {
        self.tx.send(signal).map_err(|_| ControlError::RunFinished)
    }

    pub fn is_finished(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiver side, owned by the run
#[derive(Debug)]
pub struct ControlReceiver {
    rx: UnboundedReceiver<ControlSignal>,
    stopped: bool,
    skip_pending: bool,
}

pub fn control_channel() -> (ControlHandle, ControlReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ControlHandle { tx },
        ControlReceiver {
            rx,
            stopped: false,
            skip_pending: false,
        },
    )
}

impl ControlReceiver {
    // * Folds every queued signal into local state without waiting.
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(ControlSignal::Stop) => self.stopped = true,
                Ok(ControlSignal::SkipSource) => self.skip_pending = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// True once a stop has been received; stays true
    pub fn should_stop(&mut self) -> bool {
        self.drain();
        self.stopped
    }

    /// True if a skip arrived since the last observation; clears it
    pub fn take_skip(&mut self) -> bool {
        self.drain();
        std::mem::take(&mut self.skip_pending)
    }

    /// Marks the run as finished; later sends fail with `RunFinished`
    pub fn close(&mut self) {
        self.rx.close();
        self.drain();
        debug!("Control channel closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_sticky() {
        let (handle, mut rx) = control_channel();
        assert!(!rx.should_stop());
        handle.stop().unwrap();
        assert!(rx.should_stop());
        assert!(rx.should_stop());
    }

    #[test]
    fn test_skip_consumed_once() {
        let (handle, mut rx) = control_channel();
        handle.skip_source().unwrap();
        assert!(rx.take_skip());
        assert!(!rx.take_skip());
    }

    #[test]
    fn test_repeated_skips_coalesce() {
        let (handle, mut rx) = control_channel();
        handle.skip_source().unwrap();
        handle.skip_source().unwrap();
        handle.skip_source().unwrap();
        assert!(rx.take_skip());
        assert!(!rx.take_skip());
    }

    #[test]
    fn test_skip_does_not_stop() {
        let (handle, mut rx) = control_channel();
        handle.skip_source().unwrap();
        assert!(!rx.should_stop());
        assert!(rx.take_skip());
    }

    #[test]
    fn test_send_after_close_fails() {
        let (handle, mut rx) = control_channel();
        let clone = handle.clone();
        rx.close();
        assert_eq!(handle.stop(), Err(ControlError::RunFinished));
        assert_eq!(clone.skip_source(), Err(ControlError::RunFinished));
        assert!(handle.is_finished());
    }

    #[test]
    fn test_send_after_drop_fails() {
        let (handle, rx) = control_channel();
        drop(rx);
        assert_eq!(handle.stop(), Err(ControlError::RunFinished));
    }
}
