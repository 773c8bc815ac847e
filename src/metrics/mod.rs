//! Outcome events, the event channel, and the single-writer aggregator.
mod aggregator;
mod channel;
mod histogram;
mod stats;
mod types;


pub use aggregator::Aggregator;
pub use channel::{
    DropCounter, EventReceiver, EventSender, MAX_CHANNEL_CAPACITY, SendStatus, event_channel,
};
pub use histogram::LatencyHistogram;
pub use stats::RunningStats;
pub use types::{DataQuality, LatencyPercentiles, RequestOutcome, RunSummary};
