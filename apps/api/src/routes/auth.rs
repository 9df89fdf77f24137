use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::AuthProviders;
use crate::errors::AppError;
use crate::session::{clear_session_cookie, set_session_cookie, validate_access_token, Session};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub expires_at: i64,
    pub expires_in: i64,
}

impl SessionStatus {
    fn of(session: &Session, now: i64) -> Self {
        Self {
            authenticated: true,
            expires_at: session.expires_at,
            expires_in: session.expires_in(now),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub access_token: String,
}

/// GET /api/v1/auth/config
pub async fn handle_auth_config(State(state): State<AppState>) -> Json<AuthProviders> {
    Json(state.config.auth_providers.clone())
}

/// GET /api/v1/auth/session
///
/// Uses the session recovered by the middleware, or validates the provider's
/// own cookie when that one is present instead.
pub async fn handle_get_session(
    State(state): State<AppState>,
    jar: CookieJar,
    recovered: Option<Extension<Session>>,
) -> Result<Json<SessionStatus>, AppError> {
    let now = Utc::now().timestamp();
    let session = match (recovered, jar.get(&state.config.primary_cookie_name)) {
        (Some(Extension(session)), _) => Some(session),
        (None, Some(primary)) => {
            validate_access_token(state.identity.as_ref(), primary.value(), now).await
        }
        (None, None) => None,
    };

    let session = session.ok_or(AppError::Unauthorized)?;
    Ok(Json(SessionStatus::of(&session, now)))
}

/// POST /api/v1/auth/session
///
/// Writes the session cookie for a token the identity provider confirms is live.
pub async fn handle_create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionStatus>), AppError> {
    let token = req.access_token.trim();
    if token.is_empty() {
        return Err(AppError::Validation("access_token is required".to_string()));
    }

    let now = Utc::now().timestamp();
    let session = validate_access_token(state.identity.as_ref(), token, now)
        .await
        .ok_or(AppError::Unauthorized)?;

    info!(expires_at = session.expires_at, "Session cookie established");
    let jar = set_session_cookie(jar, &session, &state.session_options);
    Ok((StatusCode::CREATED, jar, Json(SessionStatus::of(&session, now))))
}

/// DELETE /api/v1/auth/session
pub async fn handle_delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (StatusCode, CookieJar) {
    info!("Session cookie cleared");
    (
        StatusCode::NO_CONTENT,
        clear_session_cookie(jar, &state.session_options),
    )
}
