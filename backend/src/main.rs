//! Backend entry-point: loads configuration, wires storage and REST
//! endpoints, and serves the OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinic_backend::inbound::http::health::HealthState;
use clinic_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use clinic_backend::outbound::security::{BuildMode, secret_fingerprint, token_secret_from_env};
use server::{ServerConfig, ServerSettings, create_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("CLINIC_BIND_ADDR is not a socket address")?;

    let secret = token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("failed to load token signing secret")?;
    info!(fingerprint = %secret_fingerprint(&secret), "token signing secret loaded");

    let mut config = ServerConfig::new(secret, bind_addr).with_token_ttl(settings.token_ttl());
    if let Some(url) = settings.database_url.as_deref() {
        let applied = run_migrations(url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(applied, "database migrations applied");
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
