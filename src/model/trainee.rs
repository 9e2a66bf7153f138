use std::fmt;

use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};

use crate::framework::{deserialize_id, CrudResource, RestResource};

/// A trainee as served by the trainee backend.
///
/// # REST Adapter
/// This struct implements [`CrudResource`], so a
/// [`ResourceClient<Trainee>`](crate::framework::ResourceClient) can fetch, create, update and
/// delete trainees on `<service-root>/trainee`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Trainee {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl Trainee {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: ID(id.into()),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Pagination bounds accepted by `getTrainee`.
#[derive(Debug, Clone, Copy, Default, PartialEq, InputObject)]
pub struct ListOptions {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// Query string sent with `GET <service-root>/trainee/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraineeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ID>,
}

impl TraineeFilter {
    pub fn new(options: ListOptions, id: Option<ID>) -> Self {
        Self {
            skip: options.skip,
            limit: options.limit,
            id,
        }
    }
}

/// Payload for `createTrainee`.
#[derive(Clone, PartialEq, Serialize, InputObject)]
pub struct CreateTraineeInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Keeps passwords out of debug logs.
impl fmt::Debug for CreateTraineeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateTraineeInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Payload for `updateTrainee`. The id travels in the body of `PUT /`.
#[derive(Debug, Clone, PartialEq, Serialize, InputObject)]
pub struct UpdateTraineeInput {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl RestResource for Trainee {
    const RESOURCE_NAME: &'static str = "trainee";
}

impl CrudResource for Trainee {
    type Filter = TraineeFilter;
    type CreateParams = CreateTraineeInput;
    type UpdateParams = UpdateTraineeInput;

    fn id(&self) -> &ID {
        &self.id
    }
}
