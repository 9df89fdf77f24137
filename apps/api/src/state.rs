use std::sync::Arc;

use crate::config::Config;
use crate::identity::IdentityProvider;
use crate::session::SessionRecoveryOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Identity provider used to validate session tokens. Swapped for a stub in tests.
    pub identity: Arc<dyn IdentityProvider>,
    /// Session cookie settings derived from `config` once at startup.
    pub session_options: SessionRecoveryOptions,
}

impl AppState {
    pub fn new(config: Config, identity: Arc<dyn IdentityProvider>) -> Self {
        let session_options = config.session_options();
        Self {
            config,
            identity,
            session_options,
        }
    }
}
