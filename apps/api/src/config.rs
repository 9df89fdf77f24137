use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::session::{
    SessionRecoveryOptions, DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECS, MAX_MAX_AGE_SECS,
};

const DEFAULT_PRIMARY_COOKIE_NAME: &str = "sb-access-token";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' has an invalid value: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailProvider {
    pub enabled: bool,
    pub require_email_confirmation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderToggle {
    pub enabled: bool,
}

/// Sign-in methods the platform advertises to its front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthProviders {
    pub email: EmailProvider,
    pub google: ProviderToggle,
    pub github: ProviderToggle,
    pub linkedin: ProviderToggle,
    pub magic_link: ProviderToggle,
}

/// Application configuration loaded from environment variables.
/// Startup fails with a `ConfigError` if the identity provider is not configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub environment: Environment,
    pub port: u16,
    pub rust_log: String,
    pub session_cookie_name: String,
    pub session_max_age_secs: i64,
    pub primary_cookie_name: String,
    pub identity_timeout: Duration,
    pub auth_providers: AuthProviders,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let supabase_url = parse_base_url(required("NEXT_PUBLIC_SUPABASE_URL")?)?;
        let supabase_anon_key = required("NEXT_PUBLIC_SUPABASE_ANON_KEY")?;

        let session_max_age_secs: i64 = parse_or(
            var("SESSION_MAX_AGE_SECS"),
            "SESSION_MAX_AGE_SECS",
            DEFAULT_MAX_AGE_SECS,
        )?;
        if !(1..=MAX_MAX_AGE_SECS).contains(&session_max_age_secs) {
            return Err(ConfigError::Invalid {
                key: "SESSION_MAX_AGE_SECS",
                value: session_max_age_secs.to_string(),
            });
        }

        let identity_timeout_secs: u64 = parse_or(
            var("IDENTITY_TIMEOUT_SECS"),
            "IDENTITY_TIMEOUT_SECS",
            DEFAULT_IDENTITY_TIMEOUT_SECS,
        )?;
        if identity_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "IDENTITY_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let flag = |key: &'static str| parse_flag(var(key), key, true);

        Ok(Config {
            supabase_url,
            supabase_anon_key,
            environment: parse_or(var("APP_ENV"), "APP_ENV", Environment::Development)?,
            port: parse_or(var("PORT"), "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_cookie_name: var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            session_max_age_secs,
            primary_cookie_name: var("PRIMARY_COOKIE_NAME")
                .unwrap_or_else(|| DEFAULT_PRIMARY_COOKIE_NAME.to_string()),
            identity_timeout: Duration::from_secs(identity_timeout_secs),
            auth_providers: AuthProviders {
                email: EmailProvider {
                    enabled: flag("AUTH_EMAIL_ENABLED")?,
                    require_email_confirmation: flag("AUTH_EMAIL_REQUIRE_CONFIRMATION")?,
                },
                google: ProviderToggle {
                    enabled: flag("AUTH_GOOGLE_ENABLED")?,
                },
                github: ProviderToggle {
                    enabled: flag("AUTH_GITHUB_ENABLED")?,
                },
                linkedin: ProviderToggle {
                    enabled: flag("AUTH_LINKEDIN_ENABLED")?,
                },
                magic_link: ProviderToggle {
                    enabled: flag("AUTH_MAGIC_LINK_ENABLED")?,
                },
            },
        })
    }

    /// Session cookie settings for this deployment. Cookies are `Secure` only in production.
    pub fn session_options(&self) -> SessionRecoveryOptions {
        SessionRecoveryOptions::default()
            .with_cookie_name(self.session_cookie_name.clone())
            .with_max_age(self.session_max_age_secs)
            .with_secure(self.environment.is_production())
    }
}

fn parse_base_url(raw: String) -> Result<String, ConfigError> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: "NEXT_PUBLIC_SUPABASE_URL",
            value: raw,
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_flag(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: value.unwrap_or_default(),
        }),
    }
}
