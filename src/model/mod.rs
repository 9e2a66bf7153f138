//! Resource representations relayed between the graph and the REST backends.
//!
//! Each type implements [`RestResource`](crate::framework::RestResource) so a generic
//! [`ResourceClient`](crate::framework::ResourceClient) can talk to its backend.

pub mod trainee;
pub mod user;

pub use trainee::*;
pub use user::*;
