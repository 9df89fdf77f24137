use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: &'static str,
    pub identity_provider: String,
    pub session_cookie: String,
}

/// GET /health
/// Liveness plus the identity provider and session cookie this instance runs with.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: if state.config.environment.is_production() {
            "production"
        } else {
            "development"
        },
        identity_provider: state.config.supabase_url.clone(),
        session_cookie: state.session_options.cookie_name.clone(),
    })
}
