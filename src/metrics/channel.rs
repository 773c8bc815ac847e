//! Bounded outcome queue between virtual users and the aggregator.
//!
//! Producers never wait for room: when the queue is full the event is
//! dropped and counted, so a slow consumer cannot throttle offered load.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::warn;

use super::RequestOutcome;

/// Result of a non-blocking send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendStatus {
    Delivered,
    /// Queue full; the event was counted as dropped.
    Dropped,
    /// Consumer gone; the event was counted as dropped.
    Closed,
}

/// Shared count of events that never reached the aggregator.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    dropped: Arc<AtomicU64>,
}

impl DropCounter {
    #[must_use]
    pub fn get(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn increment(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }
}

#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::Sender<RequestOutcome>,
    dropped: DropCounter,
}

#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<RequestOutcome>,
    dropped: DropCounter,
}

/// Largest buffer a bounded tokio channel accepts.
pub const MAX_CHANNEL_CAPACITY: usize = usize::MAX >> 3;

/// Creates the outcome channel. The capacity is clamped to
/// `1..=MAX_CHANNEL_CAPACITY`.
#[must_use]
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.clamp(1, MAX_CHANNEL_CAPACITY));
    let dropped = DropCounter::default();
    (
        EventSender {
            tx,
            dropped: dropped.clone(),
        },
        EventReceiver { rx, dropped },
    )
}

impl EventSender {
    /// Attempts to enqueue an outcome without waiting.
    pub fn send(&self, outcome: RequestOutcome) -> SendStatus {
        match self.tx.try_send(outcome) {
            Ok(()) => SendStatus::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.count_drop("full");
                SendStatus::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.count_drop("closed");
                SendStatus::Closed
            }
        }
    }

    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.get()
    }

    #[must_use]
    pub fn drop_counter(&self) -> DropCounter {
        self.dropped.clone()
    }

    fn count_drop(&self, reason: &'static str) {
        if self.dropped.increment() == 0 {
            warn!(
                "Event channel {}; dropping outcome events (reported as dropped_events).",
                reason
            );
        }
    }
}

impl EventReceiver {
    /// Next outcome, or `None` once every sender is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<RequestOutcome> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<RequestOutcome> {
        self.rx.try_recv().ok()
    }

    /// Stops accepting new events; already queued events can still be drained.
    pub fn close(&mut self) {
        self.rx.close();
    }

    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.get()
    }

    #[must_use]
    pub fn drop_counter(&self) -> DropCounter {
        self.dropped.clone()
    }
}
