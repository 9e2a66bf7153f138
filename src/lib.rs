//! # Trainee Gateway
//!
//! > **One GraphQL endpoint over the user and trainee REST services.**
//!
//! The gateway owns no data. Queries are forwarded to the backends with the caller's credential,
//! mutations are forwarded and then announced on an in-process event bus, and subscriptions turn
//! those announcements into live feeds.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Generic adapter, thin domains
//! [`ResourceClient<T>`](framework::ResourceClient) speaks the backends' REST conventions once.
//! Each domain only declares its resource name and parameter types, so adding a resource is a
//! model plus a client wrapper.
//!
//! ### Identity is data, not ambient state
//! Every operation carries its own [`OperationContext`](identity::OperationContext). Nothing about
//! the caller lives in globals or task-locals, so concurrent operations cannot leak credentials
//! into each other.
//!
//! ### Events after success
//! A mutation publishes exactly once, after the backend confirmed it. A failed call publishes
//! nothing.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: The generic REST adapter and its test double.
//! - **Key items**: [`ResourceAdapter`](framework::ResourceAdapter),
//!   [`ResourceClient`](framework::ResourceClient), [`MockAdapter`](framework::mock::MockAdapter).
//!
//! ### 2. The Interface ([`clients`], [`model`])
//! - **Role**: Typed domain clients and the data shapes they exchange.
//! - **Key items**: [`TraineeClient`](clients::TraineeClient), [`UserClient`](clients::UserClient).
//!
//! ### 3. Identity ([`identity`])
//! - **Role**: Extracts the caller credential from HTTP headers or the WebSocket handshake.
//!
//! ### 4. The Bus ([`bus`])
//! - **Role**: Topic-based fan-out from mutations to subscriptions with drop-oldest backpressure.
//!
//! ### 5. Dispatch ([`resolvers`], [`server`])
//! - **Role**: The GraphQL schema and the HTTP/WebSocket routes that serve it.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! - **Role**: Configuration, tracing and wiring everything once at startup.
//! - **Key items**: [`GatewaySystem`](lifecycle::GatewaySystem).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! SERVICE_URL=http://localhost:9001/api RUST_LOG=info cargo run
//! ```

pub mod bus;
pub mod clients;
pub mod framework;
pub mod identity;
pub mod lifecycle;
pub mod model;
pub mod resolvers;
pub mod server;
