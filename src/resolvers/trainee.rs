//! Trainee operations: reads, mutations that announce themselves on the bus, and the matching
//! subscriptions.

use async_graphql::{Context, Object, Result, Subscription, ID};
use futures::future;
use futures::stream::{Stream, StreamExt};
use tracing::info;

use super::operation_context;
use super::error::backend_failure;
use crate::bus::{Event, EventBus, Topic};
use crate::clients::TraineeClient;
use crate::model::{CreateTraineeInput, ListOptions, Trainee, TraineeFilter, UpdateTraineeInput};

#[derive(Default)]
pub struct TraineeQuery;

#[Object]
impl TraineeQuery {
    /// Trainees as the backend lists them. `id`, when given, is passed along as a filter.
    async fn get_trainee(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] options: ListOptions,
        id: Option<ID>,
    ) -> Result<Vec<Trainee>> {
        let client = ctx.data::<TraineeClient>()?;
        client
            .get_trainees(operation_context(ctx), TraineeFilter::new(options, id))
            .await
            .map_err(backend_failure)
    }
}

/// Every mutation publishes exactly one event, and only after the backend call succeeded.
#[derive(Default)]
pub struct TraineeMutation;

#[Object]
impl TraineeMutation {
    async fn create_trainee(&self, ctx: &Context<'_>, payload: CreateTraineeInput) -> Result<Trainee> {
        let client = ctx.data::<TraineeClient>()?;
        let bus = ctx.data::<EventBus>()?;

        let trainee = client
            .create_trainee(operation_context(ctx), payload)
            .await
            .map_err(backend_failure)?;

        info!(id = %trainee.id.as_str(), "Trainee created");
        bus.publish(Event::trainee_added(trainee.clone()));
        Ok(trainee)
    }

    async fn update_trainee(&self, ctx: &Context<'_>, payload: UpdateTraineeInput) -> Result<Trainee> {
        let client = ctx.data::<TraineeClient>()?;
        let bus = ctx.data::<EventBus>()?;

        let trainee = client
            .update_trainee(operation_context(ctx), payload)
            .await
            .map_err(backend_failure)?;

        info!(id = %trainee.id.as_str(), "Trainee updated");
        bus.publish(Event::trainee_updated(trainee.clone()));
        Ok(trainee)
    }

    async fn delete_trainee(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let client = ctx.data::<TraineeClient>()?;
        let bus = ctx.data::<EventBus>()?;

        let deleted = client
            .delete_trainee(operation_context(ctx), &id)
            .await
            .map_err(backend_failure)?;

        info!(id = %deleted.as_str(), "Trainee deleted");
        bus.publish(Event::trainee_deleted(deleted.clone()));
        Ok(deleted)
    }
}

/// Live change feeds. Each subscription registers on the bus when its stream starts.
#[derive(Default)]
pub struct TraineeSubscription;

#[Subscription]
impl TraineeSubscription {
    async fn trainee_added(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Trainee>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(bus
            .subscribe(&[Topic::TraineeAdded])
            .filter_map(|event| future::ready(event.into_trainee())))
    }

    async fn trainee_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Trainee>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(bus
            .subscribe(&[Topic::TraineeUpdated])
            .filter_map(|event| future::ready(event.into_trainee())))
    }

    async fn trainee_deleted(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = ID>> {
        let bus = ctx.data::<EventBus>()?;
        Ok(bus
            .subscribe(&[Topic::TraineeDeleted])
            .filter_map(|event| future::ready(event.into_deleted_id())))
    }
}
