//! Topics and the events published on them.

use std::fmt;

use async_graphql::ID;

use crate::model::Trainee;

/// The fixed set of state changes subscribers can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    TraineeAdded,
    TraineeUpdated,
    TraineeDeleted,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::TraineeAdded, Topic::TraineeUpdated, Topic::TraineeDeleted];

    pub fn name(self) -> &'static str {
        match self {
            Topic::TraineeAdded => "TRAINEE_ADDED",
            Topic::TraineeUpdated => "TRAINEE_UPDATED",
            Topic::TraineeDeleted => "TRAINEE_DELETED",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload carried by an [`Event`]. Its shape is fixed per topic.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// `TraineeAdded` and `TraineeUpdated`: the trainee the backend returned.
    Trainee(Trainee),
    /// `TraineeDeleted`: the id the backend echoed.
    Deleted(ID),
}

/// A state change announced on the bus.
///
/// Fields are private: events are built through the per-topic constructors, which keeps every
/// payload matched to its topic's subscription field.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    topic: Topic,
    payload: EventPayload,
}

impl Event {
    pub fn trainee_added(trainee: Trainee) -> Self {
        Self {
            topic: Topic::TraineeAdded,
            payload: EventPayload::Trainee(trainee),
        }
    }

    pub fn trainee_updated(trainee: Trainee) -> Self {
        Self {
            topic: Topic::TraineeUpdated,
            payload: EventPayload::Trainee(trainee),
        }
    }

    pub fn trainee_deleted(id: ID) -> Self {
        Self {
            topic: Topic::TraineeDeleted,
            payload: EventPayload::Deleted(id),
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    /// Identifier of the resource the event is about.
    pub fn resource_id(&self) -> &ID {
        match &self.payload {
            EventPayload::Trainee(trainee) => &trainee.id,
            EventPayload::Deleted(id) => id,
        }
    }

    pub fn into_trainee(self) -> Option<Trainee> {
        match self.payload {
            EventPayload::Trainee(trainee) => Some(trainee),
            EventPayload::Deleted(_) => None,
        }
    }

    pub fn into_deleted_id(self) -> Option<ID> {
        match self.payload {
            EventPayload::Deleted(id) => Some(id),
            EventPayload::Trainee(_) => None,
        }
    }
}
