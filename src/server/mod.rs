//! HTTP and WebSocket listener routes.
//!
//! - `POST /graphql`: queries and mutations. The `Authorization` header becomes the
//!   operation's [`OperationContext`].
//! - `GET /graphql`: WebSocket upgrade for subscriptions. The credential is read once from the
//!   `connection_init` payload, falling back to the upgrade request's header.
//! - `GET /health-check`: fixed liveness answer.

use async_graphql::http::ALL_WEBSOCKET_PROTOCOLS;
use async_graphql::{Data, ErrorExtensions};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::identity::OperationContext;
use crate::resolvers::{GatewayError, GatewaySchema};

pub const HEALTH_CHECK_BODY: &str = " I am OK ";

pub fn router(schema: GatewaySchema) -> Router {
    Router::new()
        .route("/graphql", get(graphql_ws_handler).post(graphql_handler))
        .route("/health-check", get(health_check))
        .with_state(schema)
}

async fn graphql_handler(State(schema): State<GatewaySchema>, headers: HeaderMap, request: GraphQLRequest) -> GraphQLResponse {
    let context = OperationContext::from_headers(&headers);
    schema.execute(request.into_inner().data(context)).await.into()
}

async fn graphql_ws_handler(
    State(schema): State<GatewaySchema>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let fallback = OperationContext::from_headers(&headers);
    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            GraphQLWebSocket::new(stream, schema, protocol)
                .on_connection_init(move |params| connection_data(params, fallback))
                .serve()
        })
}

/// Per-connection data for a subscription socket, built once at `connection_init`.
async fn connection_data(params: Value, fallback: OperationContext) -> async_graphql::Result<Data> {
    let context = connection_context(&params, fallback).map_err(|e| {
        warn!(error = %e, "Rejected subscription connection");
        e.extend()
    })?;

    debug!(has_credential = context.has_credential(), "Subscription connection initialised");
    let mut data = Data::default();
    data.insert(context);
    Ok(data)
}

/// The payload's credential wins; without one the upgrade request's header applies.
fn connection_context(params: &Value, fallback: OperationContext) -> Result<OperationContext, GatewayError> {
    Ok(OperationContext::from_connection_params(params)?.unwrap_or(fallback))
}

async fn health_check() -> &'static str {
    debug!("Health check");
    HEALTH_CHECK_BODY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use crate::clients::{TraineeClient, UserClient};
    use crate::framework::ResourceClient;
    use crate::identity::Credential;
    use crate::resolvers::build_schema;
    use axum::body::{to_bytes, Body};
    use http::{header, Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;

    fn schema_for(service_root: &str) -> GatewaySchema {
        let http = reqwest::Client::new();
        build_schema(
            TraineeClient::rest(ResourceClient::new(http.clone(), service_root)),
            UserClient::new(ResourceClient::new(http, service_root)),
            EventBus::default(),
        )
    }

    fn graphql_post() -> http::request::Builder {
        Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = router(schema_for("http://127.0.0.1:1"));

        let response = app
            .oneshot(Request::builder().uri("/health-check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], HEALTH_CHECK_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_post_forwards_authorization_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/user/me").header("authorization", "Bearer abc.def");
            then.status(200)
                .json_body(json!({"data": {"id": "u1", "name": "Ada", "email": "ada@example.com"}}));
        });
        let app = router(schema_for(&server.base_url()));

        let query = json!({"query": "{ getMe { id name } }"});
        let response = app
            .oneshot(
                graphql_post()
                    .header(header::AUTHORIZATION, "Bearer abc.def")
                    .body(Body::from(query.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"data": {"getMe": {"id": "u1", "name": "Ada"}}}));
        mock.assert();
    }

    #[tokio::test]
    async fn test_post_without_header_reaches_backend_anonymously() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/trainee/").header_missing("authorization");
            then.status(200).json_body(json!({"data": []}));
        });
        let app = router(schema_for(&server.base_url()));

        let query = json!({"query": "{ getTrainee { id } }"});
        let response = app
            .oneshot(graphql_post().body(Body::from(query.to_string())).unwrap())
            .await
            .unwrap();

        assert_eq!(body_json(response).await, json!({"data": {"getTrainee": []}}));
        mock.assert();
    }

    #[test]
    fn test_connection_payload_credential_wins_over_header() {
        let fallback = OperationContext::with_credential(Credential::parse("from-header").unwrap());

        let context = connection_context(&json!({"authorization": "from-payload"}), fallback.clone()).unwrap();
        assert_eq!(context.credential().unwrap().as_bytes(), b"from-payload");

        let context = connection_context(&json!({}), fallback.clone()).unwrap();
        assert_eq!(context, fallback);
    }

    #[tokio::test]
    async fn test_connection_rejects_non_string_credential() {
        let err = connection_data(json!({"Authorization": ["a"]}), OperationContext::anonymous())
            .await
            .unwrap_err();

        assert!(err.message.starts_with("malformed operation"));
        let code = err.extensions.unwrap().get("code").cloned();
        assert_eq!(code, Some(async_graphql::Value::from("MALFORMED_OPERATION")));
    }
}
