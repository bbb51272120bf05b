//! Marketplace entry-point: loads settings, wires stores, and serves the
//! REST API, the push channel, and OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use server::{ServerSettings, create_server, resolve_config};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let config = resolve_config(&settings).await?;
    info!(bind_addr = %settings.bind_addr()?, "starting marketplace server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
