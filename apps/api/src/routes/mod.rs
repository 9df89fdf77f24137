pub mod auth;
pub mod health;

use axum::{http::Uri, routing::get, Router};

use crate::errors::AppError;
use crate::middleware::recover_session;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/config", get(auth::handle_auth_config))
        .route(
            "/api/v1/auth/session",
            get(auth::handle_get_session)
                .post(auth::handle_create_session)
                .delete(auth::handle_delete_session),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            recover_session,
        ))
        .with_state(state)
}
