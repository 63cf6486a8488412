use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dnsdesk::config::Config;
use dnsdesk::provider::DynuClient;
use dnsdesk::router::{DeskState, desk_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        bind_addr = %cfg.bind_addr,
        database_url = %cfg.database_url,
        provider = %cfg.provider_base_url,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
        token_ttl_minutes = cfg.token_ttl_minutes,
    );
    if cfg.uses_default_secret() {
        warn!("secret_key is the built-in placeholder; set DNSDESK_SECRET_KEY before exposing this server");
    }
    if cfg.insecure_cookie {
        warn!("insecure_cookie is enabled; session cookies will be sent over plain HTTP");
    }

    let pool = dnsdesk::db::connect(&cfg.database_url).await?;
    let provider = Arc::new(DynuClient::from_config(&cfg)?);

    let state = DeskState::new(pool, provider, &cfg);
    let app = desk_router(state);

    let listener = TcpListener::bind(cfg.bind_addr).await?;
    info!("HTTP server listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
