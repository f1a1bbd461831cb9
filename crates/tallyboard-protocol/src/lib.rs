//! Wire protocol for the Tallyboard leaderboard API.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`Request`], [`Reply`], [`Operation`], the view objects,
//!   [`ChangeEvent`]) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those structures
//!   are converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during framing.
//!
//! The protocol layer sits between the transport (raw bytes) and the
//! resolver (application semantics). It knows nothing about sessions,
//! storage, or authorization — only about shapes.
//!
//! ```text
//! Transport (bytes) → Protocol (Request/Reply) → Resolver (semantics)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    ChangeEvent, Confirmation, FieldMessage, LoginView, Operation, PlayerId,
    PlayerView, Reply, Request, ResponseData, SessionView, Topic, UserId,
    UserView, WireError,
};
