//! Schema composition.
//!
//! Domains are registered here explicitly, in a fixed order, instead of being discovered at
//! runtime. Every piece is a Rust type, so a missing or mistyped piece stops the build rather
//! than a running gateway.

use async_graphql::{MergedObject, MergedSubscription, Schema};

use super::trainee::{TraineeMutation, TraineeQuery, TraineeSubscription};
use super::user::{UserMutation, UserQuery};
use crate::bus::EventBus;
use crate::clients::{TraineeClient, UserClient};

#[derive(MergedObject, Default)]
pub struct Query(TraineeQuery, UserQuery);

#[derive(MergedObject, Default)]
pub struct Mutation(TraineeMutation, UserMutation);

#[derive(MergedSubscription, Default)]
pub struct Subscription(TraineeSubscription);

pub type GatewaySchema = Schema<Query, Mutation, Subscription>;

/// Builds the executable schema with the adapters and the bus every resolver relies on.
///
/// The per-operation [`OperationContext`](crate::identity::OperationContext) is not part of the
/// schema data; the transport attaches it to each request.
pub fn build_schema(trainees: TraineeClient, users: UserClient, bus: EventBus) -> GatewaySchema {
    Schema::build(Query::default(), Mutation::default(), Subscription::default())
        .data(trainees)
        .data(users)
        .data(bus)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockAdapter;
    use crate::framework::ResourceClient;
    use std::sync::Arc;

    #[test]
    fn test_schema_exposes_every_domain_operation() {
        let schema = build_schema(
            TraineeClient::new(Arc::new(MockAdapter::new())),
            UserClient::new(ResourceClient::new(reqwest::Client::new(), "http://localhost:9000")),
            EventBus::default(),
        );
        let sdl = schema.sdl();

        for field in [
            "getTrainee(",
            "getMe:",
            "createTrainee(",
            "updateTrainee(",
            "deleteTrainee(",
            "loginUser(",
            "traineeAdded:",
            "traineeUpdated:",
            "traineeDeleted:",
        ] {
            assert!(sdl.contains(field), "missing {field} in schema:\n{sdl}");
        }
    }
}
