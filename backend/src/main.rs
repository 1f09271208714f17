//! Backend entry-point: assembles configuration and serves the watchlist API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::fingerprint::key_fingerprint;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, apply_pending_migrations};
use server::{
    ServerConfig, bind_addr_from_env, create_server, pool_config_from_env, tmdb_settings_from_env,
};

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

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

    let env = DefaultEnv::new();
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&env, mode).map_err(std::io::Error::other)?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    let bind_addr = bind_addr_from_env(&env).map_err(std::io::Error::other)?;
    let tmdb = tmdb_settings_from_env(&env).map_err(std::io::Error::other)?;
    let pool_config = pool_config_from_env(&env).map_err(std::io::Error::other)?;

    let mut config =
        ServerConfig::new(session.key, session.cookie_secure, session.same_site, bind_addr)
            .with_tmdb(tmdb);
    if let Some(pool_config) = pool_config {
        let applied = apply_pending_migrations(pool_config.database_url())
            .map_err(std::io::Error::other)?;
        info!(count = applied.len(), "database migrations applied");
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(make_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("watchlist")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}
