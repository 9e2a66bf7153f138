//! # Core REST Adapter
//!
//! This module defines the generic building blocks every backend adapter is made of.
//!
//! ## Key Types
//!
//! - [`RestResource`]: a representation served by a REST backend under `<service-root>/<name>`.
//! - [`CrudResource`]: a resource that also supports the four canonical operations.
//! - [`ResourceAdapter`]: the capability interface `{fetch, create, update, delete}`.
//! - [`ResourceClient`]: the HTTP implementation, composing a shared `reqwest::Client`.
//! - [`HeaderInjector`]: the pluggable strategy that decorates every outgoing request.
//! - [`BackendError`]: what goes wrong talking to a backend.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use async_graphql::ID;
use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument, warn};

use crate::identity::OperationContext;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A representation owned by one REST backend.
///
/// The gateway never stores these; it only decodes what the backend sends and relays it.
pub trait RestResource: DeserializeOwned + Debug + Clone + Send + Sync + 'static {
    /// Path segment appended to the service root, e.g. `trainee`.
    const RESOURCE_NAME: &'static str;
}

/// A resource the backend exposes through `GET /`, `POST /`, `PUT /` and `DELETE /<id>`.
///
/// The associated types pin each operation to its own payload, so a trainee update can never be
/// sent where a trainee create is expected.
pub trait CrudResource: RestResource {
    /// Query-string parameters for `fetch` (pagination bounds and filters).
    type Filter: Serialize + Debug + Send + Sync;

    /// Body of `create`.
    type CreateParams: Serialize + Debug + Send + Sync;

    /// Body of `update`. Carries the identifier of the resource being updated.
    type UpdateParams: Serialize + Debug + Send + Sync;

    fn id(&self) -> &ID;
}

/// Errors from a backend round trip. Never retried and never turned into an event.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("{resource} backend unreachable: {source}")]
    Transport {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status. `body` is its answer, verbatim.
    #[error("{resource} backend answered {status}: {body}")]
    Status {
        resource: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The backend answered 2xx but the body is not the expected `{ "data": ... }` envelope.
    #[error("{resource} backend sent an unreadable body: {reason}")]
    Decode {
        resource: &'static str,
        reason: String,
    },

    /// No request was sent: the target URL could not be built (bad service root, or an id
    /// that is not a usable path segment).
    #[error("invalid {resource} request: {reason}")]
    InvalidRequest {
        resource: &'static str,
        reason: String,
    },
}

impl BackendError {
    pub fn status(resource: &'static str, status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            resource,
            status,
            body: body.into(),
        }
    }

    /// HTTP status reported by the backend, if it answered at all.
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Decode { .. } | Self::InvalidRequest { .. } => None,
        }
    }
}

/// The capability interface every backend adapter offers.
///
/// Each call receives the [`OperationContext`] of the graph operation it serves so the caller's
/// credential reaches the backend.
#[async_trait]
pub trait ResourceAdapter<T: CrudResource>: Send + Sync {
    /// Reads zero or more resources. Must not change backend state.
    async fn fetch(&self, ctx: &OperationContext, filter: T::Filter) -> Result<Vec<T>, BackendError>;

    /// Creates a resource and returns it with its newly assigned identifier.
    async fn create(&self, ctx: &OperationContext, params: T::CreateParams) -> Result<T, BackendError>;

    /// Updates a resource. An unknown identifier is reported by the backend, not invented here.
    async fn update(&self, ctx: &OperationContext, params: T::UpdateParams) -> Result<T, BackendError>;

    /// Deletes a resource and returns the identifier the backend echoed back.
    async fn delete(&self, ctx: &OperationContext, id: &ID) -> Result<ID, BackendError>;
}

// =============================================================================
// 2. HEADER INJECTION
// =============================================================================

/// Decorates every request an adapter sends.
pub trait HeaderInjector: Send + Sync {
    fn inject(&self, ctx: &OperationContext, request: RequestBuilder) -> RequestBuilder;
}

/// Copies the caller's credential into `Authorization`, byte for byte.
///
/// Without a credential the header is left out entirely. Rejecting anonymous calls is the
/// backend's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardAuthorization;

impl HeaderInjector for ForwardAuthorization {
    fn inject(&self, ctx: &OperationContext, request: RequestBuilder) -> RequestBuilder {
        match ctx.credential() {
            Some(credential) => request.header(AUTHORIZATION, credential.header_value().clone()),
            None => request,
        }
    }
}

// =============================================================================
// 3. THE GENERIC HTTP CLIENT
// =============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<R> {
    data: R,
}

#[derive(Debug, Deserialize)]
struct DeletedRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: ID,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

/// Reads a backend identifier sent either as a JSON string or as a JSON number.
///
/// Use with `#[serde(deserialize_with = "deserialize_id")]` on `ID` fields of resources.
pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ID, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => ID(text),
        RawId::Number(number) => ID(number.to_string()),
    })
}

/// HTTP adapter for one backend resource rooted at `<service-root>/<RESOURCE_NAME>`.
///
/// Cloning is cheap: the underlying `reqwest::Client` pools connections and is shared.
pub struct ResourceClient<T: RestResource> {
    http: Client,
    base_url: String,
    injector: Arc<dyn HeaderInjector>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: RestResource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            injector: self.injector.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: RestResource> ResourceClient<T> {
    pub fn new(http: Client, service_root: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/{}", service_root.trim_end_matches('/'), T::RESOURCE_NAME),
            injector: Arc::new(ForwardAuthorization),
            _resource: PhantomData,
        }
    }

    /// Replaces the default [`ForwardAuthorization`] strategy.
    pub fn with_injector(mut self, injector: impl HeaderInjector + 'static) -> Self {
        self.injector = Arc::new(injector);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn invalid(&self, reason: impl Into<String>) -> BackendError {
        BackendError::InvalidRequest {
            resource: T::RESOURCE_NAME,
            reason: reason.into(),
        }
    }

    /// `<base>/<segment>`, with `segment` percent-encoded so it can never leave the resource.
    ///
    /// An empty segment addresses the collection root (`<base>/`).
    fn endpoint(&self, segment: &str) -> Result<Url, BackendError> {
        if segment == "." || segment == ".." {
            return Err(self.invalid(format!("{segment:?} is not a resource path segment")));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| self.invalid(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| self.invalid(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    fn request(&self, ctx: &OperationContext, method: Method, segment: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(segment)?;
        debug!(resource = T::RESOURCE_NAME, %method, %url, has_credential = ctx.has_credential(), "Sending request");
        Ok(self.injector.inject(ctx, self.http.request(method, url)))
    }

    /// Sends a request and unwraps the backend's `{ "data": ... }` envelope.
    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, BackendError> {
        let resource = T::RESOURCE_NAME;
        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport { resource, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(resource, %status, error = %e, "Failed to read backend error body");
                    format!("<unreadable error body: {e}>")
                }
            };
            warn!(resource, %status, "Backend rejected request");
            return Err(BackendError::Status { resource, status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { resource, source })?;
        let envelope: Envelope<R> = serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode {
            resource,
            reason: e.to_string(),
        })?;
        Ok(envelope.data)
    }

    /// `GET <base>/<segment>` for read endpoints outside the CRUD set (e.g. `me`).
    pub async fn get_at<R: DeserializeOwned>(&self, ctx: &OperationContext, segment: &str) -> Result<R, BackendError> {
        self.send(self.request(ctx, Method::GET, segment)?).await
    }

    /// `POST <base>/<segment>` with a JSON body (e.g. `login`).
    pub async fn post_at<B, R>(&self, ctx: &OperationContext, segment: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.send(self.request(ctx, Method::POST, segment)?.json(body)).await
    }
}

#[async_trait]
impl<T: CrudResource> ResourceAdapter<T> for ResourceClient<T> {
    #[instrument(skip_all, fields(resource = T::RESOURCE_NAME))]
    async fn fetch(&self, ctx: &OperationContext, filter: T::Filter) -> Result<Vec<T>, BackendError> {
        debug!(?filter, "fetch");
        self.send(self.request(ctx, Method::GET, "")?.query(&filter)).await
    }

    #[instrument(skip_all, fields(resource = T::RESOURCE_NAME))]
    async fn create(&self, ctx: &OperationContext, params: T::CreateParams) -> Result<T, BackendError> {
        let created: T = self.send(self.request(ctx, Method::POST, "")?.json(&params)).await?;
        debug!(id = %created.id().as_str(), "created");
        Ok(created)
    }

    #[instrument(skip_all, fields(resource = T::RESOURCE_NAME))]
    async fn update(&self, ctx: &OperationContext, params: T::UpdateParams) -> Result<T, BackendError> {
        let updated: T = self.send(self.request(ctx, Method::PUT, "")?.json(&params)).await?;
        debug!(id = %updated.id().as_str(), "updated");
        Ok(updated)
    }

    #[instrument(skip_all, fields(resource = T::RESOURCE_NAME, id = %id.as_str()))]
    async fn delete(&self, ctx: &OperationContext, id: &ID) -> Result<ID, BackendError> {
        if id.is_empty() {
            return Err(self.invalid("empty id"));
        }
        let deleted: DeletedRecord = self.send(self.request(ctx, Method::DELETE, id.as_str())?).await?;
        Ok(deleted.id)
    }
}
