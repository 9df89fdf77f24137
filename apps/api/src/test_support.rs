//! Shared test doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Config;
use crate::identity::{IdentityError, IdentityProvider};
use crate::session::Session;
use crate::state::AppState;

enum Reply {
    Session(Session),
    Empty,
    Failure,
}

/// In-memory identity provider that answers every lookup the same way and
/// counts how often it was asked.
pub struct StubIdentity {
    reply: Reply,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl StubIdentity {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    pub fn returning(session: Session) -> Self {
        Self::with_reply(Reply::Session(session))
    }

    pub fn empty() -> Self {
        Self::with_reply(Reply::Empty)
    }

    pub fn failing() -> Self {
        Self::with_reply(Reply::Failure)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(access_token.to_string());
        match &self.reply {
            Reply::Session(session) => Ok(Some(session.clone())),
            Reply::Empty => Ok(None),
            Reply::Failure => Err(IdentityError::Api {
                status: 503,
                message: "provider unavailable".to_string(),
            }),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "NEXT_PUBLIC_SUPABASE_URL" => Some("https://test-supabase-url.co".to_string()),
        "NEXT_PUBLIC_SUPABASE_ANON_KEY" => Some("test-anon-key".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_state(identity: Arc<StubIdentity>) -> AppState {
    AppState::new(test_config(), identity)
}
