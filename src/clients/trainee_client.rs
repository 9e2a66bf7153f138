use std::sync::Arc;

use async_graphql::ID;
use tracing::{debug, instrument};

use crate::framework::{BackendError, ResourceAdapter, ResourceClient};
use crate::identity::OperationContext;
use crate::model::{CreateTraineeInput, Trainee, TraineeFilter, UpdateTraineeInput};

/// Adapter for the trainee backend.
///
/// Resolvers only see this type; whether calls go over HTTP or to a
/// [`MockAdapter`](crate::framework::mock::MockAdapter) is decided at wiring time.
#[derive(Clone)]
pub struct TraineeClient {
    inner: Arc<dyn ResourceAdapter<Trainee>>,
}

impl TraineeClient {
    pub fn new(inner: Arc<dyn ResourceAdapter<Trainee>>) -> Self {
        Self { inner }
    }

    pub fn rest(inner: ResourceClient<Trainee>) -> Self {
        Self::new(Arc::new(inner))
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_trainees(&self, ctx: &OperationContext, filter: TraineeFilter) -> Result<Vec<Trainee>, BackendError> {
        debug!("Sending request");
        self.inner.fetch(ctx, filter).await
    }

    #[instrument(skip_all)]
    pub async fn create_trainee(&self, ctx: &OperationContext, payload: CreateTraineeInput) -> Result<Trainee, BackendError> {
        debug!(?payload, "Sending request");
        self.inner.create(ctx, payload).await
    }

    #[instrument(skip_all, fields(id = %payload.id.as_str()))]
    pub async fn update_trainee(&self, ctx: &OperationContext, payload: UpdateTraineeInput) -> Result<Trainee, BackendError> {
        debug!("Sending request");
        self.inner.update(ctx, payload).await
    }

    #[instrument(skip_all, fields(id = %id.as_str()))]
    pub async fn delete_trainee(&self, ctx: &OperationContext, id: &ID) -> Result<ID, BackendError> {
        debug!("Sending request");
        self.inner.delete(ctx, id).await
    }
}
