//! Session and credential handling for Tallyboard.
//!
//! This crate owns two related concerns:
//!
//! 1. **Session tracking** — the token-keyed registry of who is logged
//!    in ([`SessionStore`]), with a fixed inactivity window and a sweep
//!    for abandoned sessions.
//! 2. **Credential hashing** — the one-way password hash and its
//!    constant-time verifier ([`PasswordHasher`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Resolver (above)  ← asks "whose token is this?" before every mutation
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below)  ← provides UserId
//! ```
//!
//! The store here tracks *authentication* state only. Nothing about
//! players or accounts lives in this crate; the resolver joins a session
//! to its user record through the document store.

mod auth;
mod error;
mod manager;
mod session;

pub use auth::PasswordHasher;
pub use error::SessionError;
pub use manager::SessionStore;
pub use session::{SessionConfig, SessionRecord};
