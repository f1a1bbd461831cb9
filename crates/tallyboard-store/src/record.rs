//! Storage records: what the store keeps, as opposed to what the API
//! returns.
//!
//! Records carry everything the store knows — including the password
//! hash, which must never reach the wire. The resolver converts records
//! into protocol view objects and decides which fields survive.

use tallyboard_protocol::{PlayerId, UserId};

/// A player row as persisted.
///
/// `id`, `created_at`, and `updated_at` are store-assigned; callers never
/// choose them. Timestamps are unix-epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub score: i64,
    pub created_at: u64,
    pub updated_at: u64,
}

/// The caller-supplied part of a new player. The store fills in the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub score: i64,
}

/// A user account row as persisted.
///
/// `password_hash` is the hasher's output string, never a plaintext
/// password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: u64,
}

/// The caller-supplied part of a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}
