use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::session::{get_session_from_cookie, set_session_cookie};
use crate::state::AppState;

/// Recovers the session from the first-party cookie when the identity
/// provider's own cookie is missing.
///
/// A recovered session is inserted into the request extensions and the
/// cookie is re-issued on the way out, unless the handler already wrote it.
pub async fn recover_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    if jar.get(&state.config.primary_cookie_name).is_some() {
        return next.run(req).await;
    }

    let Some(session) =
        get_session_from_cookie(&jar, state.identity.as_ref(), &state.session_options).await
    else {
        return next.run(req).await;
    };

    debug!(expires_at = session.expires_at, "Recovered session from cookie");
    req.extensions_mut().insert(session.clone());

    let response = next.run(req).await;
    if writes_cookie(&response, &state.session_options.cookie_name) {
        return response;
    }

    (set_session_cookie(jar, &session, &state.session_options), response).into_response()
}

fn writes_cookie(response: &Response, name: &str) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            value
                .split_once('=')
                .is_some_and(|(cookie_name, _)| cookie_name.trim() == name)
        })
}
