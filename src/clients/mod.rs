//! Domain adapters wrapping the generic [`framework`](crate::framework) engine.

pub mod trainee_client;
pub mod user_client;

pub use trainee_client::*;
pub use user_client::*;
