//! The Tallyboard core: validation, authorization, persistence
//! orchestration, and change-event publication.
//!
//! Every API operation lands here. The [`Resolver`] runs each one
//! through the same fixed pipeline:
//!
//! ```text
//! authentication → existence → validation → conflict → write → publish
//! ```
//!
//! raising the first applicable failure from the [`ResolverError`]
//! taxonomy and publishing to the [`EventBus`] only after a successful
//! write.
//!
//! # Key types
//!
//! - [`Resolver`] — one method per operation, generic over the store
//! - [`EventBus`] / [`EventSubscription`] — typed pub/sub for the two
//!   change topics
//! - [`ResolverError`] — the tagged failure taxonomy (401/404/422/500)
//! - [`validate`] — the pure field checks and their accumulator

pub mod validate;

mod error;
mod events;
mod resolver;

pub use error::ResolverError;
pub use events::{EventBus, EventSubscription, DEFAULT_BUS_CAPACITY};
pub use resolver::Resolver;
