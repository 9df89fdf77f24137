use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::{debug, warn};

use super::{Session, SessionRecoveryOptions};
use crate::identity::IdentityProvider;

/// Recover the session behind the session cookie, if there is a live one.
///
/// 1. No cookie (or an empty one) → `None`, without contacting the provider.
/// 2. Otherwise the stored token is checked with the identity provider.
/// 3. Provider failure, unknown token, or `expires_at <= now` → `None`.
/// 4. Otherwise the provider's session is returned as-is.
pub async fn get_session_from_cookie(
    jar: &CookieJar,
    provider: &dyn IdentityProvider,
    options: &SessionRecoveryOptions,
) -> Option<Session> {
    let token = jar
        .get(&options.cookie_name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())?;

    validate_access_token(provider, token, Utc::now().timestamp()).await
}

/// Ask the provider about `access_token` and keep the session only if it is
/// still live at `now`. Errors are logged and swallowed.
pub async fn validate_access_token(
    provider: &dyn IdentityProvider,
    access_token: &str,
    now: i64,
) -> Option<Session> {
    match provider.get_session(access_token).await {
        Ok(Some(session)) if session.is_expired_at(now) => {
            debug!(expires_at = session.expires_at, "Discarding expired session");
            None
        }
        Ok(Some(session)) => Some(session),
        Ok(None) => {
            debug!("Identity provider has no session for token");
            None
        }
        Err(e) => {
            warn!("Error getting session: {e}");
            None
        }
    }
}
