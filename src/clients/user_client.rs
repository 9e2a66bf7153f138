use serde_json::Value;
use tracing::{debug, instrument};

use crate::framework::{BackendError, ResourceClient};
use crate::identity::OperationContext;
use crate::model::{LoginInput, User};

/// Adapter for the user backend's read and auth endpoints.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// `GET /me`: the user behind the forwarded credential.
    #[instrument(skip_all)]
    pub async fn get_me(&self, ctx: &OperationContext) -> Result<User, BackendError> {
        debug!("Sending request");
        self.inner.get_at(ctx, "me").await
    }

    /// `POST /login`. The session representation is relayed untouched.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login_user(&self, ctx: &OperationContext, credentials: &LoginInput) -> Result<Value, BackendError> {
        debug!("Sending request");
        self.inner.post_at(ctx, "login", credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Credential;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;

    fn client(server: &MockServer) -> UserClient {
        UserClient::new(ResourceClient::new(Client::new(), &server.base_url()))
    }

    #[tokio::test]
    async fn test_get_me_forwards_credential() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/user/me").header("authorization", "Bearer me");
            then.status(200)
                .json_body(json!({"data": {"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "trainer"}}));
        });

        let ctx = OperationContext::with_credential(Credential::parse("Bearer me").unwrap());
        let me = client(&server).get_me(&ctx).await.unwrap();

        mock.assert();
        assert_eq!(me.role.as_deref(), Some("trainer"));
    }

    #[tokio::test]
    async fn test_login_relays_session_untouched() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/user/login")
                .header_missing("authorization")
                .json_body(json!({"email": "ada@example.com", "password": "pw"}));
            then.status(200).json_body(json!({"data": {"token": "jwt", "expiresIn": 3600}}));
        });

        let credentials = LoginInput {
            email: "ada@example.com".into(),
            password: "pw".into(),
        };
        let session = client(&server)
            .login_user(&OperationContext::anonymous(), &credentials)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(session, json!({"token": "jwt", "expiresIn": 3600}));
    }

    #[tokio::test]
    async fn test_login_failure_is_backend_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(POST).path("/user/login");
            then.status(401).body("Invalid credentials");
        });

        let credentials = LoginInput {
            email: "ada@example.com".into(),
            password: "wrong".into(),
        };
        let err = client(&server)
            .login_user(&OperationContext::anonymous(), &credentials)
            .await
            .unwrap_err();

        assert_eq!(err.http_status(), Some(reqwest::StatusCode::UNAUTHORIZED));
        assert!(err.to_string().contains("Invalid credentials"));
    }
}
