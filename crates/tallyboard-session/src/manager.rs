//! The session store: tracks every live session by its token.
//!
//! Responsibilities:
//! - Creating a session (with a fresh random token) on login
//! - Resolving a presented token to a user id, refreshing the deadline
//! - Destroying a session on logout
//! - Sweeping out sessions whose inactivity window elapsed
//!
//! # Concurrency note
//!
//! `SessionStore` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. The server owns it behind a single async mutex and that is
//! the only access path. Keeping the store itself simple avoids hidden
//! locking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tallyboard_protocol::UserId;

use crate::{SessionConfig, SessionError, SessionRecord};

/// Registry of live sessions, keyed by token.
///
/// ## Lifecycle
///
/// ```text
/// login ──→ create() ──→ authenticate()* ──→ destroy()   (logout)
///                │                │
///                │                └── deadline refreshed on each use
///                ▼
///          expire_stale()  ──→ removed     (inactivity window elapsed)
/// ```
pub struct SessionStore {
    /// All live sessions. One user may hold several (one per login).
    sessions: HashMap<String, SessionRecord>,

    /// TTL configuration.
    config: SessionConfig,
}

impl SessionStore {
    /// Creates an empty store with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.ttl_secs)
    }

    /// Creates a session for a freshly authenticated user.
    ///
    /// Generates a random token and stores the record; the returned
    /// reference is handed to the client (well, its token is).
    pub fn create(&mut self, user_id: UserId) -> &SessionRecord {
        let token = generate_token();
        let record = SessionRecord {
            token: token.clone(),
            user_id,
            is_logged_in: true,
            deadline: Instant::now() + self.ttl(),
        };
        self.sessions.insert(token.clone(), record);

        tracing::info!(%user_id, "session created");

        // The entry was inserted on the line above; the invariant makes
        // this lookup infallible.
        self.sessions.get(&token).expect("just inserted")
    }

    /// Resolves a token to its user, refreshing the inactivity deadline.
    ///
    /// This is the check every authenticated operation runs first.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] — token unknown
    /// - [`SessionError::Expired`] — window elapsed; the record is
    ///   removed as a side effect
    pub fn authenticate(&mut self, token: &str) -> Result<UserId, SessionError> {
        let Some(record) = self.sessions.get_mut(token) else {
            return Err(SessionError::NotFound);
        };

        if record.is_expired() {
            let user_id = record.user_id;
            self.sessions.remove(token);
            tracing::info!(%user_id, "session expired on use");
            return Err(SessionError::Expired);
        }

        record.deadline = Instant::now() + Duration::from_secs(self.config.ttl_secs);
        Ok(record.user_id)
    }

    /// Looks at a session without refreshing its deadline.
    ///
    /// Returns `None` for unknown *and* expired tokens — callers that
    /// only want to know "who is this, if anyone" don't care which.
    pub fn peek(&self, token: &str) -> Option<&SessionRecord> {
        self.sessions.get(token).filter(|r| !r.is_expired())
    }

    /// Destroys a session (logout).
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the token is unknown or the session
    /// already expired — either way there is nothing to log out of.
    pub fn destroy(&mut self, token: &str) -> Result<SessionRecord, SessionError> {
        match self.sessions.remove(token) {
            Some(record) if record.is_expired() => Err(SessionError::NotFound),
            Some(record) => {
                tracing::info!(user_id = %record.user_id, "session destroyed");
                Ok(record)
            }
            None => Err(SessionError::NotFound),
        }
    }

    /// Removes every session whose window elapsed. Returns how many.
    ///
    /// The server calls this on an interval so abandoned sessions don't
    /// accumulate; `authenticate` also removes expired records lazily,
    /// so the sweep is about memory, not correctness.
    pub fn expire_stale(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired());
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, "expired sessions swept");
        }
        removed
    }

    /// Number of live (possibly expired-but-unswept) sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// Enough that guessing a live token is computationally infeasible; the
/// token is the whole credential, so this is the security floor.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================
