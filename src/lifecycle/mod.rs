//! Runtime orchestration and lifecycle management.
//!
//! This module contains the infrastructure for starting the gateway:
//!
//! - **Configuration**: reading service locations and limits from the environment
//! - **System wiring**: creating the HTTP client, adapters, event bus and schema once
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`GatewayConfig`] - Startup configuration
//! - [`GatewaySystem`] - Owns every long-lived component and hands out the schema
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod gateway_system;
pub mod tracing;

pub use config::*;
pub use gateway_system::*;
pub use tracing::*;
