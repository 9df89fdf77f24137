use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::{Duration, OffsetDateTime};

use super::{Session, SessionRecoveryOptions, MAX_MAX_AGE_SECS};

/// Build the session cookie carrying `session.access_token`.
pub fn session_cookie(session: &Session, options: &SessionRecoveryOptions) -> Cookie<'static> {
    let max_age = Duration::seconds(options.max_age.clamp(0, MAX_MAX_AGE_SECS));
    let attrs = &options.cookie_options;

    let mut cookie = Cookie::build((options.cookie_name.clone(), session.access_token.clone()))
        .path(attrs.path.clone())
        .http_only(attrs.http_only)
        .secure(attrs.secure)
        .same_site(attrs.same_site.into())
        .max_age(max_age)
        .build();
    if let Some(expires) = OffsetDateTime::now_utc().checked_add(max_age) {
        cookie.set_expires(expires);
    }
    cookie
}

/// Write the session cookie into the response jar.
///
/// No validation is done here; callers only pass sessions the identity
/// provider has just confirmed.
pub fn set_session_cookie(
    jar: CookieJar,
    session: &Session,
    options: &SessionRecoveryOptions,
) -> CookieJar {
    jar.add(session_cookie(session, options))
}

/// Overwrite the session cookie with an empty, already-expired value on the same path.
pub fn clear_session_cookie(jar: CookieJar, options: &SessionRecoveryOptions) -> CookieJar {
    let removal = Cookie::build((options.cookie_name.clone(), ""))
        .path(options.cookie_options.path.clone())
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build();
    jar.add(removal)
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::SameSite;

    use super::*;
    use crate::session::{CookieOptions, SameSitePolicy};

    fn session() -> Session {
        Session {
            access_token: "test-token".into(),
            refresh_token: "test-refresh-token".into(),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        }
    }

    #[test]
    fn test_set_then_read_round_trip() {
        let options = SessionRecoveryOptions::default();
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);

        let cookie = jar.get("aicareer_session").expect("cookie written");
        assert_eq!(cookie.value(), "test-token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_expiry_is_now_plus_max_age() {
        let options = SessionRecoveryOptions::default().with_max_age(3600);
        let before = OffsetDateTime::now_utc();
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);

        let expires = jar
            .get("aicareer_session")
            .and_then(|c| c.expires_datetime())
            .expect("expires set");
        let lifetime = expires - before;
        assert!(lifetime > Duration::seconds(3598) && lifetime <= Duration::seconds(3601));
    }

    #[test]
    fn test_oversized_max_age_is_clamped() {
        let options = SessionRecoveryOptions::default().with_max_age(i64::MAX);
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);

        let cookie = jar.get("aicareer_session").expect("cookie written");
        assert_eq!(cookie.value(), "test-token");
        assert_eq!(cookie.max_age(), Some(Duration::days(400)));
        assert!(cookie.expires_datetime().is_some());
    }

    #[test]
    fn test_negative_max_age_expires_immediately() {
        let options = SessionRecoveryOptions::default().with_max_age(-5);
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);
        assert_eq!(
            jar.get("aicareer_session").and_then(|c| c.max_age()),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_custom_options() {
        let options = SessionRecoveryOptions {
            max_age: 3600,
            cookie_name: "custom_session".into(),
            cookie_options: CookieOptions {
                path: "/api".into(),
                http_only: true,
                secure: true,
                same_site: SameSitePolicy::Strict,
            },
        };
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);

        assert!(jar.get("aicareer_session").is_none());
        let cookie = jar.get("custom_session").expect("custom cookie");
        assert_eq!(cookie.value(), "test-token");
        assert_eq!(cookie.path(), Some("/api"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::hours(1)));
    }

    #[test]
    fn test_clear_leaves_empty_expired_cookie() {
        let options = SessionRecoveryOptions::default();
        let jar = set_session_cookie(CookieJar::new(), &session(), &options);
        let jar = clear_session_cookie(jar, &options);

        let cookie = jar.get("aicareer_session").expect("removal cookie");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn test_clear_without_prior_cookie() {
        let options = SessionRecoveryOptions::default().with_cookie_name("custom");
        let jar = clear_session_cookie(CookieJar::new(), &options);
        assert_eq!(jar.get("custom").map(|c| c.value()), Some(""));
    }
}
