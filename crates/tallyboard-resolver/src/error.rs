//! The application error taxonomy.
//!
//! Every operation failure is one of five tagged cases, each mapped to a
//! numeric application status. The resolver raises the first applicable
//! case per operation in a fixed order — authentication, then existence,
//! then validation, then conflict — and never attempts recovery: a raised
//! error ends the operation and crosses the transport boundary as a
//! [`WireError`] payload.

use tallyboard_protocol::{FieldMessage, WireError};
use tallyboard_store::StoreError;

/// A failed resolver operation.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The operation requires a session and the token was missing,
    /// unknown, or expired.
    #[error("Not authenticated.")]
    Unauthenticated,

    /// The addressed entity does not exist. The message names it
    /// ("Player not found.", "User not found.").
    #[error("{0}")]
    NotFound(String),

    /// One or more fields failed validation. `details` carries every
    /// failure from the operation, in field order — callers see the full
    /// list, not just the first problem.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldMessage>,
    },

    /// The write would collide with an existing resource (duplicate
    /// player name, already-registered email).
    #[error("{message}")]
    Conflict {
        message: String,
        details: Vec<FieldMessage>,
    },

    /// Unexpected infrastructure failure. The source is logged at the
    /// boundary; the wire shape carries only this generic message.
    #[error("Internal server error.")]
    Internal(#[from] StoreError),
}

impl ResolverError {
    /// The standard validation failure: generic top-level message, the
    /// per-field story in the list.
    pub fn invalid_input(details: Vec<FieldMessage>) -> Self {
        Self::Validation {
            message: "Invalid input.".into(),
            details,
        }
    }

    /// The application status code for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::NotFound(_) => 404,
            Self::Validation { .. } | Self::Conflict { .. } => 422,
            Self::Internal(_) => 500,
        }
    }

    /// The per-field messages, if this failure carries any.
    pub fn details(&self) -> &[FieldMessage] {
        match self {
            Self::Validation { details, .. } | Self::Conflict { details, .. } => details,
            _ => &[],
        }
    }

    /// Converts into the wire payload shape.
    ///
    /// The `Display` string is the wire message, which for `Internal`
    /// means the generic text — store/infra detail never leaks here.
    pub fn to_wire(&self) -> WireError {
        WireError {
            message: self.to_string(),
            status: self.status(),
            data: self.details().to_vec(),
        }
    }
}
