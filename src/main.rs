use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use triage_core::{
    CoreConfig, TriageService,
    config::{
        knowledge_base_path_from_env_value, top_n_from_env_value,
        unknown_tag_policy_from_env_value,
    },
    constants::{DEFAULT_REST_ADDR, ENV_KB_PATH, ENV_REST_ADDR, ENV_TOP_N, ENV_UNKNOWN_TAGS},
};

/// Main entry point for the triage advisor service
///
/// Loads the knowledge base once, then serves the REST API until the process is stopped.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TRIAGE_KB_PATH`: knowledge base YAML replacing the built-in one
/// - `TRIAGE_TOP_N`: number of top conditions per assessment (default: 3)
/// - `TRIAGE_UNKNOWN_TAGS`: `reject` (default) or `ignore`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage=info".parse()?)
                .add_directive("knowledge=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var(ENV_REST_ADDR)
        .unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
        .parse()?;

    let cfg = CoreConfig::new(
        knowledge_base_path_from_env_value(std::env::var(ENV_KB_PATH).ok()),
        top_n_from_env_value(std::env::var(ENV_TOP_N).ok())?,
        unknown_tag_policy_from_env_value(std::env::var(ENV_UNKNOWN_TAGS).ok())?,
    )?;
    let service = TriageService::from_config(cfg)?;

    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let app = router(AppState {
        service: Arc::new(service),
    });

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
