//! Cancellation signal for losing racers.

use tokio::sync::broadcast;

/// Broadcast signal raised once the race is decided.
///
/// Each racer subscribes before it is spawned, so a trigger is never missed.
/// Dropping the signal also wakes subscribers (`RecvError::Closed`), which
/// racers treat the same as an explicit trigger.
#[derive(Debug)]
pub struct CancelSignal {
    tx: broadcast::Sender<()>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Raise the signal. Returns the number of racers still listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_subscribers() {
        let signal = CancelSignal::new();
        let mut a = signal.subscribe();
        let mut b = signal.subscribe();

        assert_eq!(signal.trigger(), 2);
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn drop_wakes_subscribers() {
        let signal = CancelSignal::new();
        let mut rx = signal.subscribe();
        drop(signal);
        assert!(rx.recv().await.is_err());
    }

    #[test]
    fn trigger_without_listeners() {
        assert_eq!(CancelSignal::new().trigger(), 0);
    }
}
