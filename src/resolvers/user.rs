//! User operations. Read and auth only; users are never mutated through the gateway.

use async_graphql::{Context, Json, Object, Result};
use serde_json::Value;

use super::error::backend_failure;
use super::operation_context;
use crate::clients::UserClient;
use crate::model::{LoginInput, User};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The user the forwarded credential belongs to.
    async fn get_me(&self, ctx: &Context<'_>) -> Result<User> {
        let client = ctx.data::<UserClient>()?;
        client.get_me(operation_context(ctx)).await.map_err(backend_failure)
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Exchanges credentials for the backend's session representation, relayed as-is.
    async fn login_user(&self, ctx: &Context<'_>, payload: LoginInput) -> Result<Json<Value>> {
        let client = ctx.data::<UserClient>()?;
        client
            .login_user(operation_context(ctx), &payload)
            .await
            .map(Json)
            .map_err(backend_failure)
    }
}
