//! Error types for the session layer.

/// Errors that can occur while resolving a session token.
///
/// Both variants mean "this token buys you nothing" — the resolver maps
/// either one to a 401. They stay distinct so logs can tell a stale
/// client from a made-up token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the presented token.
    #[error("no session for the given token")]
    NotFound,

    /// A session existed but its inactivity window elapsed.
    #[error("session expired")]
    Expired,
}
