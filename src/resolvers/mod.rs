//! # Resolver Dispatch
//!
//! Maps graph operations to adapter calls.
//!
//! - **Queries** call an adapter's read path and return the backend's representation unchanged.
//! - **Mutations** call the adapter and, on success only, publish one [`Event`](crate::bus::Event)
//!   before answering. A failed backend call publishes nothing.
//! - **Subscriptions** register on the [`EventBus`](crate::bus::EventBus) and map each event to
//!   the field they declare.
//!
//! Inputs are only checked by the schema's own types; a request failing them is answered with
//! an error before any resolver runs.
//!
//! Backend calls are not cancelled when the client goes away: once dispatched they run to
//! completion.

pub mod error;
pub mod schema;
pub mod trainee;
pub mod user;

pub use error::*;
pub use schema::*;
pub use trainee::*;
pub use user::*;

use async_graphql::Context;

use crate::identity::{OperationContext, ANONYMOUS};

/// The operation's context, or an anonymous one when the transport attached none.
fn operation_context<'a>(ctx: &'a Context<'_>) -> &'a OperationContext {
    ctx.data_opt::<OperationContext>().unwrap_or(&ANONYMOUS)
}
