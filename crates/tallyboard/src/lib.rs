//! # Tallyboard
//!
//! A leaderboard API server: player records in, sorted standings out,
//! with account authentication and live change notifications.
//!
//! One WebSocket endpoint carries everything. Queries and mutations are
//! request/reply pairs; a `Subscribe` request turns the same connection
//! into a stream of change events for one topic. Replies always arrive
//! as ordinary data frames — application failures live inside the
//! payload's `errors` list, tagged with a 401/404/422/500 status.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tallyboard::prelude::*;
//!
//! # async fn run() -> Result<(), TallyboardError> {
//! let server = ServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(Arc::new(MemoryStore::new()))
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod websocket;

pub use error::TallyboardError;
pub use server::{Server, ServerBuilder};
pub use websocket::{ConnectionId, TransportError, WsConnection, WsListener};

/// The common imports for embedding or driving a server.
pub mod prelude {
    pub use crate::{Server, ServerBuilder, TallyboardError};
    pub use tallyboard_protocol::{
        ChangeEvent, Confirmation, FieldMessage, JsonCodec, LoginView, Operation,
        PlayerId, PlayerView, Reply, Request, ResponseData, SessionView, Topic,
        UserId, UserView, WireError,
    };
    pub use tallyboard_resolver::{EventBus, Resolver, ResolverError};
    pub use tallyboard_session::{PasswordHasher, SessionConfig, SessionStore};
    pub use tallyboard_store::{DocumentStore, MemoryStore, StoreError};
}
