//! Persistence adapter for Tallyboard.
//!
//! Persistence is delegated to an external document store; this crate is
//! the seam. [`DocumentStore`] is the trait the resolver talks to —
//! typed create/find/update/delete over the two collections (`players`,
//! `users`) — and [`MemoryStore`] is the in-process implementation used
//! by the default server wiring and by every test.
//!
//! # What the store owns
//!
//! Identifiers and timestamps. Callers hand over the writable fields
//! ([`NewPlayer`], [`NewUser`]); the store assigns the id and stamps
//! `created_at`/`updated_at`. Nothing above this crate invents an id.
//!
//! # What the store does NOT do
//!
//! - **Uniqueness.** Neither player names nor user emails are constraints
//!   here. The resolver pre-checks with a lookup and then writes — two
//!   separate round-trips, so two concurrent creates with the same name
//!   can both land. Accepted at this system's scale; callers of this
//!   trait must not assume otherwise.
//! - **Transactions.** Every method is one independent round-trip.
//! - **Retries.** A [`StoreError`] is final for that operation.

mod error;
mod memory;
mod record;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{NewPlayer, NewUser, PlayerRecord, UserRecord};

use std::future::Future;

use tallyboard_protocol::{PlayerId, UserId};

/// Typed access to the two document collections.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` — one store handle is shared across every
///   connection task, and the server holds it for its whole lifetime.
/// - Each method returns `impl Future<…> + Send` rather than being a
///   bare `async fn`: connection handlers are spawned onto the runtime,
///   which needs the whole future — store calls included — to be `Send`.
///   Implementations still just write `async fn`.
///
/// All methods take `&self`; implementations provide their own interior
/// synchronization.
pub trait DocumentStore: Send + Sync + 'static {
    // -- players --

    /// Inserts a player; the store assigns id and timestamps.
    fn insert_player(
        &self,
        new: NewPlayer,
    ) -> impl Future<Output = Result<PlayerRecord, StoreError>> + Send;

    /// Looks up a player by id.
    fn player_by_id(
        &self,
        id: PlayerId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// Looks up a player by exact name (the duplicate pre-check).
    fn player_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// All players ordered by score descending. Ties keep a consistent
    /// order but no particular one is promised.
    fn players_by_score_desc(
        &self,
    ) -> impl Future<Output = Result<Vec<PlayerRecord>, StoreError>> + Send;

    /// Rewrites a player's name and score, bumping `updated_at`.
    /// Returns `None` if the row is gone.
    fn update_player(
        &self,
        id: PlayerId,
        name: String,
        score: i64,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    /// Removes a player, returning the prior record, or `None` if the
    /// row was already gone.
    fn delete_player(
        &self,
        id: PlayerId,
    ) -> impl Future<Output = Result<Option<PlayerRecord>, StoreError>> + Send;

    // -- users --

    /// Inserts an account; the store assigns id and timestamp.
    fn insert_user(
        &self,
        new: NewUser,
    ) -> impl Future<Output = Result<UserRecord, StoreError>> + Send;

    /// Looks up an account by email (login and the duplicate pre-check).
    fn user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Looks up an account by id (session identity resolution).
    fn user_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;
}
