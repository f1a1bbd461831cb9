//! The resolver: one method per API operation.
//!
//! Each operation runs the same pipeline — authentication, existence,
//! validation, conflict, then the store write, then event publication —
//! raising the first applicable failure and stopping there. Change
//! events are published strictly *after* a successful write: a failed
//! operation never reaches the bus.
//!
//! The resolver owns no mutable state of its own. It borrows three
//! injected collaborators: the document store (persistence), the session
//! store (authentication), and the event bus (notification). Each store
//! call is an independent round-trip; nothing here is transactional, so
//! two racing mutations can interleave between a pre-check and its write
//! (two creates slipping past the duplicate-name check, an update racing
//! a delete). Accepted at this scale; the store seam documents it.

use std::sync::Arc;

use tallyboard_protocol::{
    ChangeEvent, Confirmation, FieldMessage, LoginView, PlayerId, PlayerView,
    SessionView, Topic, UserId, UserView,
};
use tallyboard_session::{PasswordHasher, SessionStore};
use tallyboard_store::{DocumentStore, NewPlayer, NewUser, PlayerRecord, UserRecord};
use tokio::sync::Mutex;

use crate::validate::{
    validate_email, validate_name, validate_password, validate_score, Validator,
};
use crate::{EventBus, EventSubscription, ResolverError};

/// The operation layer, generic over the store backend.
pub struct Resolver<S> {
    store: Arc<S>,
    sessions: Arc<Mutex<SessionStore>>,
    hasher: PasswordHasher,
    bus: EventBus,
}

// Manual impl: cloning shares the collaborators, and `S` itself needs no
// `Clone` bound for that.
impl<S> Clone for Resolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sessions: Arc::clone(&self.sessions),
            hasher: self.hasher.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<S: DocumentStore> Resolver<S> {
    /// Wires the resolver to its collaborators. All three are injected —
    /// tests hand in isolated instances, the server hands in the shared
    /// ones.
    pub fn new(store: Arc<S>, sessions: Arc<Mutex<SessionStore>>, bus: EventBus) -> Self {
        Self {
            store,
            sessions,
            hasher: PasswordHasher::default(),
            bus,
        }
    }

    /// Swaps the credential hasher (tests use a cheap one).
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Opens a change-event subscription on the injected bus.
    pub fn subscribe(&self, topic: Topic) -> EventSubscription {
        self.bus.subscribe(topic)
    }

    /// The injected bus handle.
    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// All players, highest score first.
    pub async fn get_all_players(&self) -> Result<Vec<PlayerView>, ResolverError> {
        let records = self.store.players_by_score_desc().await?;
        Ok(records.into_iter().map(player_view).collect())
    }

    /// Reports who the token belongs to. Never fails: an absent, stale,
    /// or unresolvable token yields the logged-out placeholder. A store
    /// failure here is logged and degrades to the placeholder too.
    pub async fn session(&self, token: Option<&str>) -> SessionView {
        let Some(token) = token else {
            return SessionView::logged_out();
        };

        let user_id = {
            let sessions = self.sessions.lock().await;
            match sessions.peek(token) {
                Some(record) => record.user_id,
                None => return SessionView::logged_out(),
            }
        };

        match self.store.user_by_id(user_id).await {
            Ok(Some(user)) => identity_view(&user),
            Ok(None) => {
                tracing::warn!(%user_id, "session points at a missing user");
                SessionView::logged_out()
            }
            Err(error) => {
                tracing::warn!(%error, "session identity lookup failed");
                SessionView::logged_out()
            }
        }
    }

    // -----------------------------------------------------------------
    // Player mutations
    // -----------------------------------------------------------------

    /// Creates a player and publishes an upsert event.
    pub async fn create_player(
        &self,
        token: Option<&str>,
        name: String,
        score: i64,
    ) -> Result<PlayerView, ResolverError> {
        self.require_session(token).await?;

        let mut v = Validator::default();
        v.check(validate_name(&name));
        v.check(validate_score(score));
        v.finish()?;

        // Uniqueness pre-check. A concurrent create with the same name
        // can land between this lookup and the insert below.
        if self.store.player_by_name(&name).await?.is_some() {
            return Err(ResolverError::Conflict {
                message: "Player already exists.".into(),
                details: vec![FieldMessage::new("Duplicate player name.")],
            });
        }

        let record = self.store.insert_player(NewPlayer { name, score }).await?;
        tracing::info!(player_id = %record.id, "player created");

        let view = player_view(record);
        self.bus.publish(ChangeEvent {
            topic: Topic::UpsertPlayer,
            player: view.clone(),
        });
        Ok(view)
    }

    /// Rewrites a player's name and score and publishes an upsert event.
    pub async fn update_player(
        &self,
        token: Option<&str>,
        player_id: PlayerId,
        name: String,
        score: i64,
    ) -> Result<PlayerView, ResolverError> {
        self.require_session(token).await?;

        // Existence before validation, matching the fixed check order.
        if self.store.player_by_id(player_id).await?.is_none() {
            return Err(ResolverError::NotFound("Player not found.".into()));
        }

        let mut v = Validator::default();
        v.check(validate_name(&name));
        v.check(validate_score(score));
        v.finish()?;

        let updated = self
            .store
            .update_player(player_id, name, score)
            .await?
            // A concurrent delete can win between the check and the write.
            .ok_or_else(|| ResolverError::NotFound("Player not found.".into()))?;
        tracing::info!(%player_id, "player updated");

        let view = player_view(updated);
        self.bus.publish(ChangeEvent {
            topic: Topic::UpsertPlayer,
            player: view.clone(),
        });
        Ok(view)
    }

    /// Deletes a player, returning the prior record and publishing a
    /// delete event carrying it.
    pub async fn delete_player(
        &self,
        token: Option<&str>,
        player_id: PlayerId,
    ) -> Result<PlayerView, ResolverError> {
        self.require_session(token).await?;

        if self.store.player_by_id(player_id).await?.is_none() {
            return Err(ResolverError::NotFound("Player not found.".into()));
        }

        let prior = self
            .store
            .delete_player(player_id)
            .await?
            .ok_or_else(|| ResolverError::NotFound("Player not found.".into()))?;
        tracing::info!(%player_id, "player deleted");

        let view = player_view(prior);
        self.bus.publish(ChangeEvent {
            topic: Topic::DeletePlayer,
            player: view.clone(),
        });
        Ok(view)
    }

    // -----------------------------------------------------------------
    // Account operations
    // -----------------------------------------------------------------

    /// Registers an account. Open registration: no session required.
    /// The reply never includes the password in any form.
    pub async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> Result<UserView, ResolverError> {
        let mut v = Validator::default();
        v.check(validate_email(&email));
        v.check(validate_password(&password));
        v.check(validate_name(&name));
        v.finish()?;

        // Same pre-check-then-write pattern (and race) as player names.
        if self.store.user_by_email(&email).await?.is_some() {
            return Err(ResolverError::Conflict {
                message: "User already exists.".into(),
                details: vec![],
            });
        }

        let password_hash = self.hasher.hash(&password);
        let record = self
            .store
            .insert_user(NewUser {
                email,
                name,
                password_hash,
            })
            .await?;
        tracing::info!(user_id = %record.id, "user created");

        Ok(UserView {
            user_id: record.id,
            email: record.email,
            name: record.name,
        })
    }

    /// Verifies credentials and establishes a session. The returned view
    /// carries the token the client must present from now on.
    pub async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<LoginView, ResolverError> {
        let Some(user) = self.store.user_by_email(&email).await? else {
            return Err(ResolverError::NotFound("User not found.".into()));
        };

        if !self.hasher.verify(&password, &user.password_hash) {
            return Err(ResolverError::Validation {
                message: "Incorrect password.".into(),
                details: vec![],
            });
        }

        // Session persisted before the reply leaves — the token the
        // client receives is already valid.
        let token = {
            let mut sessions = self.sessions.lock().await;
            sessions.create(user.id).token.clone()
        };
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(LoginView {
            session_token: token,
            user: identity_view(&user),
        })
    }

    /// Destroys the presented session.
    pub async fn logout(&self, token: Option<&str>) -> Result<Confirmation, ResolverError> {
        let Some(token) = token else {
            return Err(ResolverError::Unauthenticated);
        };

        let mut sessions = self.sessions.lock().await;
        sessions
            .destroy(token)
            .map_err(|_| ResolverError::Unauthenticated)?;

        Ok(Confirmation {
            message: "Logged out successfully.".into(),
        })
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// The gate in front of every authenticated operation. Refreshes the
    /// session's inactivity deadline as a side effect.
    async fn require_session(
        &self,
        token: Option<&str>,
    ) -> Result<UserId, ResolverError> {
        let Some(token) = token else {
            return Err(ResolverError::Unauthenticated);
        };
        let mut sessions = self.sessions.lock().await;
        sessions
            .authenticate(token)
            .map_err(|_| ResolverError::Unauthenticated)
    }
}

fn player_view(record: PlayerRecord) -> PlayerView {
    PlayerView {
        player_id: record.id,
        name: record.name,
        score: record.score,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn identity_view(user: &UserRecord) -> SessionView {
    SessionView {
        is_logged_in: true,
        user_id: Some(user.id),
        email: user.email.clone(),
        name: user.name.clone(),
    }
}

// =========================================================================
// Tests
// =========================================================================
