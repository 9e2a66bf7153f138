//! # Event Bus
//!
//! Process-wide, in-memory publish/subscribe broker that turns successful mutations into
//! subscription events.
//!
//! ## Delivery model
//!
//! - One bounded `tokio::sync::broadcast` channel per [`Topic`], sized at construction.
//! - [`EventBus::publish`] never waits: it hands the event to every receiver registered on the
//!   topic at that instant and returns how many there were.
//! - [`EventBus::subscribe`] registers immediately and returns a lazy, unbounded stream. There is
//!   no replay, so a subscriber only sees events published after it registered.
//! - Each subscriber receives the events of one topic in publish order. Nothing is promised
//!   across topics.
//! - **Backpressure is drop-oldest**: a subscriber more than `capacity` events behind loses the
//!   oldest ones, logs a [`DeliveryFault`] and carries on. The publisher and other subscribers
//!   are unaffected.
//! - Dropping the stream deregisters the subscriber and frees whatever was buffered for it.
//!
//! The bus is created once by [`GatewaySystem`](crate::lifecycle::GatewaySystem) and handed to
//! resolvers as schema data. It holds no persistent state.

pub mod error;
pub mod topic;

pub use error::*;
pub use topic::*;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

/// A subscriber's view of the bus: every future event on its topics.
pub type EventStream = BoxStream<'static, Event>;

#[derive(Debug, Clone)]
pub struct EventBus {
    senders: [broadcast::Sender<Event>; 3],
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl EventBus {
    /// Events buffered per subscriber before drop-oldest kicks in.
    pub const DEFAULT_CAPACITY: usize = 64;

    /// Creates the bus. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            senders: Topic::ALL.map(|_| broadcast::channel(capacity).0),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.senders[topic.index()]
    }

    /// Delivers `event` to every subscriber currently registered on its topic.
    ///
    /// Returns the number of subscribers reached. Zero is not an error.
    pub fn publish(&self, event: Event) -> usize {
        let topic = event.topic();
        debug!(%topic, id = %event.resource_id().as_str(), "Publishing");
        match self.sender(topic).send(event) {
            Ok(delivered) => {
                debug!(%topic, delivered, "Published");
                delivered
            }
            Err(_) => {
                debug!(%topic, "Published with no live subscribers");
                0
            }
        }
    }

    /// Registers a new subscriber on `topics` and returns its stream.
    ///
    /// Every call is an independent registration. Repeated topics are delivered once.
    pub fn subscribe(&self, topics: &[Topic]) -> EventStream {
        let mut unique: Vec<Topic> = Vec::with_capacity(topics.len());
        for topic in topics {
            if !unique.contains(topic) {
                unique.push(*topic);
            }
        }
        debug!(topics = ?unique, "Subscribed");

        let streams = unique.into_iter().map(|topic| {
            BroadcastStream::new(self.sender(topic).subscribe())
                .filter_map(move |item| future::ready(deliverable(topic, item)))
                .boxed()
        });
        stream::select_all(streams).boxed()
    }

    /// Number of live registrations on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

fn deliverable(topic: Topic, item: Result<Event, BroadcastStreamRecvError>) -> Option<Event> {
    match item {
        Ok(event) => Some(event),
        Err(BroadcastStreamRecvError::Lagged(missed)) => {
            let fault = DeliveryFault::Lagged { topic, missed };
            warn!(%topic, missed, error = %fault, "Dropped events for slow subscriber");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Trainee;
    use async_graphql::ID;
    use futures::FutureExt;

    fn trainee(id: &str) -> Trainee {
        Trainee::new(id, format!("name-{id}"), format!("{id}@example.com"))
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_every_event_in_order() {
        let bus = EventBus::default();
        let mut first = bus.subscribe(&[Topic::TraineeUpdated]);
        let mut second = bus.subscribe(&[Topic::TraineeUpdated]);

        for id in ["1", "2", "3"] {
            assert_eq!(bus.publish(Event::trainee_updated(trainee(id))), 2);
        }

        for stream in [&mut first, &mut second] {
            for id in ["1", "2", "3"] {
                let event = stream.next().await.unwrap();
                assert_eq!(event.resource_id(), &ID::from(id));
            }
        }
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_replay() {
        let bus = EventBus::default();
        assert_eq!(bus.publish(Event::trainee_added(trainee("1"))), 0);

        let mut late = bus.subscribe(&[Topic::TraineeAdded]);
        assert!(late.next().now_or_never().is_none());

        bus.publish(Event::trainee_added(trainee("2")));
        assert_eq!(late.next().await.unwrap().resource_id(), &ID::from("2"));
    }

    #[tokio::test]
    async fn test_subscriber_only_sees_its_topics() {
        let bus = EventBus::default();
        let mut deletions = bus.subscribe(&[Topic::TraineeDeleted]);

        bus.publish(Event::trainee_added(trainee("1")));
        bus.publish(Event::trainee_deleted(ID::from("1")));

        let event = deletions.next().await.unwrap();
        assert_eq!(event.topic(), Topic::TraineeDeleted);
        assert_eq!(event.into_deleted_id(), Some(ID::from("1")));
        assert!(deletions.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_multi_topic_subscription_merges_topics() {
        let bus = EventBus::default();
        let mut all = bus.subscribe(&Topic::ALL);

        bus.publish(Event::trainee_added(trainee("1")));
        bus.publish(Event::trainee_deleted(ID::from("1")));

        let mut topics = vec![all.next().await.unwrap().topic(), all.next().await.unwrap().topic()];
        topics.sort_by_key(|t| t.index());
        assert_eq!(topics, vec![Topic::TraineeAdded, Topic::TraineeDeleted]);
    }

    #[tokio::test]
    async fn test_repeated_topic_is_delivered_once() {
        let bus = EventBus::default();
        let mut stream = bus.subscribe(&[Topic::TraineeAdded, Topic::TraineeAdded]);
        assert_eq!(bus.subscriber_count(Topic::TraineeAdded), 1);

        bus.publish(Event::trainee_added(trainee("1")));
        assert!(stream.next().await.is_some());
        assert!(stream.next().now_or_never().is_none());
    }

    #[tokio::test]
    async fn test_dropping_stream_deregisters_subscriber() {
        let bus = EventBus::default();
        let stream = bus.subscribe(&[Topic::TraineeAdded]);
        let _other = bus.subscribe(&[Topic::TraineeAdded]);
        assert_eq!(bus.subscriber_count(Topic::TraineeAdded), 2);

        drop(stream);
        assert_eq!(bus.subscriber_count(Topic::TraineeAdded), 1);
        assert_eq!(bus.publish(Event::trainee_added(trainee("1"))), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_drops_oldest_without_blocking_publisher() {
        let bus = EventBus::new(2);
        let mut slow = bus.subscribe(&[Topic::TraineeAdded]);
        let mut fast = bus.subscribe(&[Topic::TraineeAdded]);

        for id in ["1", "2", "3", "4"] {
            assert_eq!(bus.publish(Event::trainee_added(trainee(id))), 2);
            assert_eq!(fast.next().await.unwrap().resource_id(), &ID::from(id));
        }

        // Capacity two: "1" and "2" fell out of the slow subscriber's window.
        assert_eq!(slow.next().await.unwrap().resource_id(), &ID::from("3"));
        assert_eq!(slow.next().await.unwrap().resource_id(), &ID::from("4"));
        assert!(slow.next().now_or_never().is_none());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        assert_eq!(EventBus::new(0).capacity(), 1);
    }

    #[test]
    fn test_event_constructors_pair_topic_and_payload() {
        let added = Event::trainee_added(trainee("7"));
        assert_eq!(added.topic(), Topic::TraineeAdded);
        assert_eq!(added.clone().into_deleted_id(), None);
        assert_eq!(added.into_trainee().map(|t| t.id), Some(ID::from("7")));

        assert_eq!(Topic::TraineeUpdated.to_string(), "TRAINEE_UPDATED");
    }
}
