//! Generic REST adapter framework.
//!
//! This module provides the building blocks shared by every backend adapter: the resource
//! traits, the capability interface and its HTTP implementation.
//!
//! # Main Components
//!
//! - [`RestResource`] / [`CrudResource`] - Traits resource representations implement
//! - [`ResourceAdapter`] - The `{fetch, create, update, delete}` capability interface
//! - [`ResourceClient`] - HTTP implementation over a shared `reqwest::Client`
//! - [`HeaderInjector`] / [`ForwardAuthorization`] - Pluggable request decoration
//! - [`BackendError`] - Backend failures, surfaced unmodified
//!
//! # Testing
//!
//! See [`mock`] module for an adapter that answers from queued expectations.

pub mod core;
pub mod mock;

pub use self::core::*;
