//! Fan-out of progress percentages to any number of subscribers.
//!
//! Each subscriber owns a small bounded channel. Publishing never
//! blocks: a subscriber whose channel is full or whose receiver has
//! been dropped is removed on the spot.

use crate::core::progress::ProgressSink;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 128;

/// Handle returned by [`ProgressBroadcaster::subscribe`]
#[derive(Debug)]
pub struct ProgressSubscription {
    id: u64,
    receiver: Receiver<u8>,
}

impl ProgressSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the next percentage, or `None` once the broadcaster
    /// has dropped this subscriber
    pub fn recv(&self) -> Option<u8> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<u8> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<u8, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.receiver.iter()
    }
}

/// Publish/subscribe broadcaster for progress updates
#[derive(Debug)]
pub struct ProgressBroadcaster {
    subscribers: Mutex<Vec<(u64, Sender<u8>)>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl ProgressBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Each subscriber may fall `capacity` updates behind before it is dropped
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self) -> ProgressSubscription {
        let (sender, receiver) = bounded(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, sender));
        ProgressSubscription { id, receiver }
    }

    /// Remove a subscriber explicitly
    pub fn unsubscribe(&self, subscription: &ProgressSubscription) {
        self.lock().retain(|(id, _)| *id != subscription.id);
    }

    /// Deliver to every live subscriber, returning how many received it
    pub fn broadcast(&self, percent: u8) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|(id, sender)| match sender.try_send(percent) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                debug!(subscriber = id, "Dropping progress subscriber");
                false
            }
        });
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Sender<u8>)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ProgressBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressBroadcaster {
    fn publish(&self, percent: u8) {
        self.broadcast(percent);
    }
}
