use axum::Router;
use tracing::info;

use crate::bus::EventBus;
use crate::clients::{TraineeClient, UserClient};
use crate::framework::ResourceClient;
use crate::lifecycle::GatewayConfig;
use crate::resolvers::{build_schema, GatewaySchema};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The gateway's long-lived components, created once at process start.
///
/// `GatewaySystem` is responsible for:
/// - **Dependency Wiring**: one shared HTTP client behind both backend adapters
/// - **Event Bus Ownership**: the single bus instance, injected into the schema
/// - **Schema Composition**: the executable schema handed to the listener
///
/// Nothing here is torn down during normal operation. Live subscriptions end with their
/// connections; a restart loses them, which is fine because they are tied to those connections.
///
/// # Example
///
/// ```ignore
/// let config = GatewayConfig::from_env()?;
/// let system = GatewaySystem::new(config)?;
///
/// let listener = tokio::net::TcpListener::bind(("0.0.0.0", system.config.port)).await?;
/// axum::serve(listener, system.router()).await?;
/// ```
pub struct GatewaySystem {
    pub config: GatewayConfig,

    /// Adapter for `<service-root>/trainee`
    pub trainee_client: TraineeClient,

    /// Adapter for `<service-root>/user`
    pub user_client: UserClient,

    /// The process-wide bus shared by mutation and subscription resolvers
    pub bus: EventBus,

    schema: GatewaySchema,
}

impl GatewaySystem {
    /// Wires REST adapters for the services under `config.service_url`.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let trainee_client = TraineeClient::rest(ResourceClient::new(http.clone(), &config.service_url));
        let user_client = UserClient::new(ResourceClient::new(http, &config.service_url));

        Ok(Self::with_clients(config, trainee_client, user_client))
    }

    /// Wires the given adapters, e.g. a trainee client backed by a mock.
    pub fn with_clients(config: GatewayConfig, trainee_client: TraineeClient, user_client: UserClient) -> Self {
        let bus = EventBus::new(config.event_bus_capacity);
        let schema = build_schema(trainee_client.clone(), user_client.clone(), bus.clone());

        info!(
            service_url = %config.service_url,
            env = %config.env,
            bus_capacity = bus.capacity(),
            "Gateway system ready"
        );

        Self {
            config,
            trainee_client,
            user_client,
            bus,
            schema,
        }
    }

    pub fn schema(&self) -> GatewaySchema {
        self.schema.clone()
    }

    /// The HTTP/WebSocket listener routes serving this system's schema.
    pub fn router(&self) -> Router {
        crate::server::router(self.schema())
    }
}
