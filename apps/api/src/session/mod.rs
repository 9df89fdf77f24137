//! Cookie-backed session recovery.
//!
//! The identity provider owns sessions. This module keeps a copy of the access
//! token in a first-party cookie and, when a request arrives without the
//! provider's own cookie, re-validates that token and refreshes the cookie.
//!
//! Every failure on the recovery path (no cookie, provider error, expired
//! session) collapses to `None`.

pub mod cookies;
pub mod recovery;

use axum_extra::extract::cookie::SameSite;

pub use cookies::{clear_session_cookie, set_session_cookie};
pub use recovery::{get_session_from_cookie, validate_access_token};

pub const DEFAULT_COOKIE_NAME: &str = "aicareer_session";
/// 7 days.
pub const DEFAULT_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;
/// 400 days, the longest `Max-Age` browsers honour.
pub const MAX_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// A session as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64, // unix seconds
}

impl Session {
    /// A session is expired once `expires_at` is at or before `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Seconds left before expiry, floored at zero.
    pub fn expires_in(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Lax,
    Strict,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            http_only: true,
            secure: false,
            same_site: SameSitePolicy::Lax,
        }
    }
}

/// Cookie name, lifetime and attributes used by the recovery helpers.
///
/// `max_age` is the only lifetime knob; the `Expires` attribute is derived from it.
/// Cookie writes clamp it to `0..=MAX_MAX_AGE_SECS`.
/// `secure` defaults to `false`; `Config::session_options` turns it on in production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecoveryOptions {
    pub max_age: i64,
    pub cookie_name: String,
    pub cookie_options: CookieOptions,
}

impl Default for SessionRecoveryOptions {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE_SECS,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_options: CookieOptions::default(),
        }
    }
}

impl SessionRecoveryOptions {
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.cookie_options.secure = secure;
        self
    }
}
