//! Write-once rendezvous between racers and the coordinator.

use std::sync::{Arc, Mutex, TryLockError};

use tokio::sync::oneshot;

use crate::source::SourceId;

/// Single-assignment slot holding the sending half of a oneshot channel.
///
/// The first successful racer takes the sender and delivers; everyone after
/// that finds the slot empty and drops its payload. When every clone of the
/// slot is gone without a delivery, the receiver observes a closed channel.
#[derive(Debug)]
pub struct WinnerSlot<T> {
    tx: Mutex<Option<oneshot::Sender<(SourceId, T)>>>,
}

impl<T> WinnerSlot<T> {
    pub fn channel() -> (Arc<Self>, oneshot::Receiver<(SourceId, T)>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            tx: Mutex::new(Some(tx)),
        };
        (Arc::new(slot), rx)
    }

    /// Try to claim the slot. Returns `true` if this payload was delivered.
    ///
    /// Never blocks: a contended lock means another racer is claiming it.
    pub fn offer(&self, source: SourceId, payload: T) -> bool {
        let sender = match self.tx.try_lock() {
            Ok(mut guard) => guard.take(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
            Err(TryLockError::WouldBlock) => None,
        };

        match sender {
            Some(tx) => tx.send((source, payload)).is_ok(),
            None => false,
        }
    }
}
