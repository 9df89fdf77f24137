//! Identity provider seam.
//!
//! All session validation goes through `IdentityProvider`. `AppState` holds an
//! `Arc<dyn IdentityProvider>` built once at startup; tests swap in doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Session;

pub mod supabase;

pub use supabase::SupabaseClient;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed access token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the session behind `access_token`.
    ///
    /// `Ok(None)` means the provider does not recognise the token.
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, IdentityError>;
}
