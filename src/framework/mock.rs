//! # Mock Framework
//!
//! Utilities for testing resolvers without a running REST backend.
//!
//! [`MockAdapter`] implements [`ResourceAdapter`] by answering from a queue of expectations,
//! and records the credential each call carried so identity forwarding can be asserted.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_graphql::ID;
use async_trait::async_trait;

use crate::framework::{BackendError, CrudResource, ResourceAdapter};
use crate::identity::OperationContext;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected call and the response it should produce.
enum Expectation<T: CrudResource> {
    Fetch(Result<Vec<T>, BackendError>),
    Create(Result<T, BackendError>),
    Update(Result<T, BackendError>),
    Delete(Result<ID, BackendError>),
}

impl<T: CrudResource> Expectation<T> {
    fn operation(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    /// Raw bytes of the forwarded credential, `None` when the call was anonymous.
    pub credential: Option<Vec<u8>>,
    /// `Debug` rendering of the call's argument.
    pub argument: String,
}

/// A mock adapter with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockAdapter::<Trainee>::new();
/// mock.expect_create().return_ok(trainee);
/// mock.expect_delete().return_err(BackendError::status("trainee", StatusCode::NOT_FOUND, "gone"));
///
/// let client = TraineeClient::new(Arc::new(mock.clone()));
/// // Drive resolvers...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockAdapter<T: CrudResource> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl<T: CrudResource> Clone for MockAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<T: CrudResource> Default for MockAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: CrudResource> MockAdapter<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects a `fetch` call.
    pub fn expect_fetch(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Fetch)
    }

    /// Expects a `create` call.
    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Create)
    }

    /// Expects an `update` call.
    pub fn expect_update(&self) -> ExpectationBuilder<T, T> {
        self.builder(Expectation::Update)
    }

    /// Expects a `delete` call.
    pub fn expect_delete(&self) -> ExpectationBuilder<T, ID> {
        self.builder(Expectation::Delete)
    }

    fn builder<R>(&self, wrap: fn(Result<R, BackendError>) -> Expectation<T>) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap,
        }
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn next(&self, operation: &'static str, ctx: &OperationContext, argument: String) -> Expectation<T> {
        lock(&self.calls).push(RecordedCall {
            operation,
            credential: ctx.credential().map(|c| c.as_bytes().to_vec()),
            argument,
        });

        match lock(&self.expectations).pop_front() {
            Some(expectation) if expectation.operation() == operation => expectation,
            Some(expectation) => panic!(
                "Unexpected {operation} call, next expectation is {}",
                expectation.operation()
            ),
            None => panic!("Unexpected {operation} call, no expectations left"),
        }
    }
}

/// Builder that queues the response of one expected call.
pub struct ExpectationBuilder<T: CrudResource, R> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    wrap: fn(Result<R, BackendError>) -> Expectation<T>,
}

impl<T: CrudResource, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        lock(&self.expectations).push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: BackendError) {
        lock(&self.expectations).push_back((self.wrap)(Err(error)));
    }
}

#[async_trait]
impl<T: CrudResource> ResourceAdapter<T> for MockAdapter<T> {
    async fn fetch(&self, ctx: &OperationContext, filter: T::Filter) -> Result<Vec<T>, BackendError> {
        match self.next("fetch", ctx, format!("{filter:?}")) {
            Expectation::Fetch(response) => response,
            _ => unreachable!("operation checked in next()"),
        }
    }

    async fn create(&self, ctx: &OperationContext, params: T::CreateParams) -> Result<T, BackendError> {
        match self.next("create", ctx, format!("{params:?}")) {
            Expectation::Create(response) => response,
            _ => unreachable!("operation checked in next()"),
        }
    }

    async fn update(&self, ctx: &OperationContext, params: T::UpdateParams) -> Result<T, BackendError> {
        match self.next("update", ctx, format!("{params:?}")) {
            Expectation::Update(response) => response,
            _ => unreachable!("operation checked in next()"),
        }
    }

    async fn delete(&self, ctx: &OperationContext, id: &ID) -> Result<ID, BackendError> {
        match self.next("delete", ctx, id.as_str().to_string()) {
            Expectation::Delete(response) => response,
            _ => unreachable!("operation checked in next()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Credential;
    use crate::model::{CreateTraineeInput, Trainee, TraineeFilter};
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_mock_adapter_with_expectations() {
        let mock = MockAdapter::<Trainee>::new();
        mock.expect_create().return_ok(Trainee::new("t-1", "Ada", "ada@example.com"));
        mock.expect_fetch().return_ok(vec![]);

        let ctx = OperationContext::with_credential(Credential::parse("Bearer x").unwrap());
        let input = CreateTraineeInput {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
        };

        let created = mock.create(&ctx, input).await.unwrap();
        assert_eq!(created.id, ID::from("t-1"));
        assert!(mock.fetch(&ctx, TraineeFilter::default()).await.unwrap().is_empty());

        mock.verify();
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].operation, "create");
        assert_eq!(calls[0].credential.as_deref(), Some(&b"Bearer x"[..]));
        assert!(!calls[0].argument.contains("pw"), "password leaked: {}", calls[0].argument);
    }

    #[tokio::test]
    async fn test_mock_adapter_returns_queued_error() {
        let mock = MockAdapter::<Trainee>::new();
        mock.expect_delete()
            .return_err(BackendError::status("trainee", StatusCode::BAD_GATEWAY, "down"));

        let err = mock.delete(&OperationContext::anonymous(), &ID::from("t-1")).await.unwrap_err();
        assert_eq!(err.http_status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(mock.calls()[0].credential, None);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_panics_on_unmet_expectation() {
        let mock = MockAdapter::<Trainee>::new();
        mock.expect_update().return_ok(Trainee::new("t-1", "A", "a@example.com"));
        mock.verify();
    }
}
