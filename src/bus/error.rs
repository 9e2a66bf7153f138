//! Error types for the event bus.

use thiserror::Error;

use super::Topic;

/// A failure on one subscriber's delivery path.
///
/// Faults are logged and swallowed inside that subscriber's stream. The publisher and every
/// other subscriber never see them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryFault {
    /// The subscriber fell more than the bus capacity behind; the oldest events were dropped.
    #[error("subscriber on {topic} lagged and missed {missed} events")]
    Lagged { topic: Topic, missed: u64 },
}
