//! Unified error type for the Tallyboard server.

use tallyboard_protocol::ProtocolError;

use crate::websocket::TransportError;

/// Top-level error for server setup and connection handling.
///
/// Application failures never appear here — they travel inside replies
/// as error payloads. This type covers what's left: the transport and
/// the framing. `#[from]` lets `?` convert the layer errors directly.
#[derive(Debug, thiserror::Error)]
pub enum TallyboardError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
