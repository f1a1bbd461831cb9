//! Session types: the server-side record behind a client-held token.
//!
//! A session is not a domain entity — it is a capability marker. The
//! client holds a random token; the server holds this record. Presenting
//! the token *is* the authentication.

use std::time::Instant;

use tallyboard_protocol::UserId;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Inactivity window in seconds. A session that goes unused for this
    /// long is expired; each authenticated operation pushes the deadline
    /// out again.
    ///
    /// Default: 900 seconds (15 minutes).
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: 900 }
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// One live session.
///
/// Created by a successful `login`, destroyed by `logout` or by the
/// expiry sweep. `deadline` uses `Instant` — the monotonic clock — so a
/// system clock jump can't log everyone out (or keep them alive forever).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// The secret the client holds. 32 hex chars, 128 bits of entropy.
    pub token: String,

    /// Whose session this is.
    pub user_id: UserId,

    /// Always true for the record's lifetime — records only exist for
    /// logged-in users — but carried explicitly because the session
    /// identity report includes it.
    pub is_logged_in: bool,

    /// When the session expires if it stays unused.
    pub(crate) deadline: Instant,
}

impl SessionRecord {
    /// True once the inactivity window has elapsed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
