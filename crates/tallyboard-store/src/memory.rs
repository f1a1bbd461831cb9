//! In-memory [`DocumentStore`] implementation.
//!
//! Two `HashMap`s behind one async mutex. Ids are assigned from
//! monotonically increasing counters, timestamps from the system clock
//! at write time. This is the store the default server wiring and the
//! test suites run against; a real deployment would put a database
//! client behind the same trait.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tallyboard_protocol::{PlayerId, UserId};
use tokio::sync::Mutex;

use crate::{DocumentStore, NewPlayer, NewUser, PlayerRecord, StoreError, UserRecord};

/// Current wall-clock time as unix-epoch milliseconds.
///
/// A clock before the epoch collapses to 0 rather than failing the write.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Default)]
struct Inner {
    players: HashMap<PlayerId, PlayerRecord>,
    users: HashMap<UserId, UserRecord>,
    next_player_id: u64,
    next_user_id: u64,
}

/// HashMap-backed document store.
///
/// The mutex makes each method an atomic round-trip, which is exactly the
/// guarantee an external document store gives per operation — and no
/// more. Sequences of calls interleave freely across tasks.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    async fn insert_player(&self, new: NewPlayer) -> Result<PlayerRecord, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_player_id += 1;
        let now = now_millis();
        let record = PlayerRecord {
            id: PlayerId(inner.next_player_id),
            name: new.name,
            score: new.score,
            created_at: now,
            updated_at: now,
        };
        inner.players.insert(record.id, record.clone());
        tracing::debug!(player_id = %record.id, "player inserted");
        Ok(record)
    }

    async fn player_by_id(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.players.get(&id).cloned())
    }

    async fn player_by_name(&self, name: &str) -> Result<Option<PlayerRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.players.values().find(|p| p.name == name).cloned())
    }

    async fn players_by_score_desc(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        let inner = self.inner.lock().await;
        let mut players: Vec<PlayerRecord> = inner.players.values().cloned().collect();
        // Sort by id first so equal scores come out in insertion order on
        // every call, then stable-sort by score so that order survives.
        players.sort_by_key(|p| p.id.0);
        players.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(players)
    }

    async fn update_player(
        &self,
        id: PlayerId,
        name: String,
        score: i64,
    ) -> Result<Option<PlayerRecord>, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.players.get_mut(&id) else {
            return Ok(None);
        };
        record.name = name;
        record.score = score;
        record.updated_at = now_millis();
        tracing::debug!(player_id = %id, "player updated");
        Ok(Some(record.clone()))
    }

    async fn delete_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        let mut inner = self.inner.lock().await;
        let prior = inner.players.remove(&id);
        if prior.is_some() {
            tracing::debug!(player_id = %id, "player deleted");
        }
        Ok(prior)
    }

    async fn insert_user(&self, new: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.next_user_id += 1;
        let record = UserRecord {
            id: UserId(inner.next_user_id),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now_millis(),
        };
        inner.users.insert(record.id, record.clone());
        tracing::debug!(user_id = %record.id, "user inserted");
        Ok(record)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }
}

// =========================================================================
// Tests
// =========================================================================
