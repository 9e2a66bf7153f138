//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered by `RUST_LOG`
//! (default `info`).
//!
//! ## What Gets Traced
//!
//! - **Adapter calls**: one span per backend call with the `resource` name, plus the method,
//!   URL and whether a credential was forwarded. Credential values are never logged.
//! - **Mutations**: the affected id once the backend succeeded.
//! - **Bus**: each publish with its `topic` and how many subscribers it reached; slow
//!   subscribers that lost events.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Request URLs, filters and publish fan-out
//! RUST_LOG=debug cargo run
//!
//! # Only the adapter engine
//! RUST_LOG=trainee_gateway::framework=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
