mod config;
mod errors;
mod identity;
mod middleware;
mod routes;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::identity::SupabaseClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing identity provider settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AI Career API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize identity provider client
    let identity = SupabaseClient::new(
        config.supabase_url.clone(),
        config.supabase_anon_key.clone(),
        config.identity_timeout,
    )?;
    info!(
        "Identity provider client initialized ({}, timeout {:?})",
        config.supabase_url, config.identity_timeout
    );

    let state = AppState::new(config.clone(), Arc::new(identity));
    info!(
        "Session cookie '{}' (max age {}s, secure: {})",
        state.session_options.cookie_name,
        state.session_options.max_age,
        state.session_options.cookie_options.secure
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the web app origin in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
