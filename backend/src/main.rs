//! Backend entry-point: applies migrations, wires adapters and serves the API.

mod server;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use motofinance::inbound::http::health::HealthState;
use motofinance::inbound::http::session_config::{BuildMode, session_settings_from_env};
use motofinance::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use motofinance::outbound::sms::select_gateway;
use motofinance::settings::AppSettings;
use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load configuration")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let host: IpAddr = settings
        .host()
        .parse()
        .wrap_err_with(|| format!("invalid bind host '{}'", settings.host()))?;
    let bind_addr = SocketAddr::new(host, settings.port());

    let database_url = settings.database_url()?;
    let applied = run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(count = applied.len(), "database migrations applied");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;
    let gateway = select_gateway(settings.sms_gateway()?).wrap_err("failed to build SMS gateway")?;
    let http_state = build_http_state(
        &pool,
        gateway,
        settings.sms_signature(),
        Arc::new(DefaultClock),
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        http_state,
        ServerConfig::from_session(session, bind_addr),
    )?;
    info!(%bind_addr, "listening");
    health_state.mark_ready();
    server.await?;
    Ok(())
}
