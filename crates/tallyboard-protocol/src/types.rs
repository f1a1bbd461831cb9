//! Core wire types for the Tallyboard API.
//!
//! This module defines every shape that travels between a client and the
//! server: the request envelope, the operations it can carry, the reply
//! envelope, the response value objects, and the change events streamed
//! to subscribers.
//!
//! Two conventions hold throughout:
//!
//! - Field names serialize as camelCase (`playerId`, `createdAt`,
//!   `isLoggedIn`) — the JSON schema clients already speak.
//! - A reply is *always* an ordinary data frame. Failures live inside the
//!   payload as a non-empty `errors` list carrying an application status
//!   code; the transport never signals them. Clients inspect the payload,
//!   not the frame.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player record.
///
/// Newtype over the store-assigned `u64`. Opaque to clients — the only
/// valid source of a `PlayerId` is a previous reply from the server.
///
/// `#[serde(transparent)]` serializes the id as a bare number, so a
/// `PlayerId(42)` is `42` on the wire, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a user account.
///
/// Same newtype pattern as [`PlayerId`]; keeping the two distinct means a
/// player id can never be passed where an account id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Response value objects
// ---------------------------------------------------------------------------

/// A player as returned to clients.
///
/// Built by the resolver from the store's record — an immutable snapshot,
/// decoupled from whatever shape the store keeps internally. Timestamps
/// are unix-epoch milliseconds assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Store-assigned identifier.
    pub player_id: PlayerId,
    /// Display name, unique among players.
    pub name: String,
    /// Non-negative score.
    pub score: i64,
    /// When the record was created (unix ms).
    pub created_at: u64,
    /// When the record was last written (unix ms).
    pub updated_at: u64,
}

/// A user account as returned to clients.
///
/// The password hash is deliberately absent — no wire shape carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
}

/// The current session identity, as reported by the `session` query and
/// echoed back by `login`.
///
/// When nobody is logged in, the placeholder form is returned: the flag
/// is false, the id absent, and the strings empty. The query itself never
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub is_logged_in: bool,
    pub user_id: Option<UserId>,
    pub email: String,
    pub name: String,
}

impl SessionView {
    /// The logged-out placeholder.
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            user_id: None,
            email: String::new(),
            name: String::new(),
        }
    }
}

/// A successful `login`: the identity plus the session token the client
/// must attach to subsequent authenticated requests.
///
/// The token is the capability — anyone holding it *is* this session
/// until it is logged out or expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub session_token: String,
    pub user: SessionView,
}

/// A bare confirmation message (`logout` returns one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// The two subscription topics.
///
/// Wire names match the subscription fields clients already use:
/// `"upsertPlayer"` for creates and updates, `"deletePlayer"` for
/// deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    UpsertPlayer,
    DeletePlayer,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpsertPlayer => write!(f, "upsertPlayer"),
            Self::DeletePlayer => write!(f, "deletePlayer"),
        }
    }
}

/// A change notification broadcast to subscribers.
///
/// Transient: exists only for the duration of delivery to listeners that
/// were subscribed when it was published. For deletions, `player` is the
/// record as it was *before* removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub topic: Topic,
    pub player: PlayerView,
}

// ---------------------------------------------------------------------------
// Error payloads
// ---------------------------------------------------------------------------

/// One per-field message inside a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub message: String,
}

impl FieldMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An application-level failure as carried inside a reply.
///
/// `status` follows HTTP conventions (401, 404, 422, 500) but is an
/// application field — the transport frame around it still looks like any
/// other reply. `data` lists per-field messages for validation failures
/// and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub message: String,
    pub status: u16,
    #[serde(default)]
    pub data: Vec<FieldMessage>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Every operation a client can request.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "CreatePlayer", "name": "Ann", "score": 10 }`. Queries and
/// mutations resolve to exactly one reply; `Subscribe` additionally opens
/// a stream of event frames that lasts until the connection closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Operation {
    // -- Queries --
    /// All players, ordered by score descending.
    GetAllPlayers,

    /// Who the attached session token says we are. Never fails; without
    /// a valid token it resolves to the logged-out placeholder.
    Session,

    // -- Player mutations (authenticated) --
    CreatePlayer {
        name: String,
        score: i64,
    },

    UpdatePlayer {
        player_id: PlayerId,
        name: String,
        score: i64,
    },

    DeletePlayer {
        player_id: PlayerId,
    },

    // -- Account operations --
    /// Open registration; no session required.
    CreateUser {
        email: String,
        password: String,
        name: String,
    },

    /// Establishes a session; the reply carries the token.
    Login {
        email: String,
        password: String,
    },

    /// Destroys the attached session.
    Logout,

    // -- Subscriptions --
    /// Start streaming change events for one topic on this connection.
    Subscribe {
        topic: Topic,
    },
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// The client → server envelope.
///
/// `id` is chosen by the client and echoed back on the matching reply
/// (and on every event frame of a subscription started by this request),
/// so concurrent operations on one connection can be correlated.
/// `session` carries the token issued by `login`, if any — the moral
/// equivalent of the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(default)]
    pub session: Option<String>,
    pub op: Operation,
}

/// What a reply's `data` field can hold.
///
/// `#[serde(tag = "type", content = "data")]` gives adjacently tagged
/// JSON: `{ "type": "Players", "data": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ResponseData {
    Players(Vec<PlayerView>),
    Player(PlayerView),
    Session(SessionView),
    User(UserView),
    LoggedIn(LoginView),
    Message(Confirmation),
    Subscribed { topic: Topic },
    Event(ChangeEvent),
}

/// The server → client envelope.
///
/// Exactly one of the two outcomes is populated: `data` on success,
/// `errors` (non-empty) on failure. Event frames reuse the envelope with
/// the originating subscription's `id` and an `Event` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    #[serde(default)]
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<WireError>,
}

impl Reply {
    /// A successful reply.
    pub fn data(id: u64, data: ResponseData) -> Self {
        Self {
            id,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A failed reply carrying one application error.
    pub fn failure(id: u64, error: WireError) -> Self {
        Self {
            id,
            data: None,
            errors: vec![error],
        }
    }

    /// An event frame for a subscription started by request `id`.
    pub fn event(id: u64, event: ChangeEvent) -> Self {
        Self::data(id, ResponseData::Event(event))
    }

    /// True when the payload reports success.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests.
    //!
    //! Clients parse these exact JSON shapes; a serde attribute slip here
    //! is an API break, so the important shapes are pinned one by one.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let id: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(id, PlayerId(42));
    }

    #[test]
    fn test_user_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&UserId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(3).to_string(), "P-3");
        assert_eq!(UserId(9).to_string(), "U-9");
    }

    // =====================================================================
    // Value objects — camelCase field names
    // =====================================================================

    #[test]
    fn test_player_view_uses_camel_case_fields() {
        let view = PlayerView {
            player_id: PlayerId(1),
            name: "Ann".into(),
            score: 10,
            created_at: 1000,
            updated_at: 2000,
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["playerId"], 1);
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["score"], 10);
        assert_eq!(json["createdAt"], 1000);
        assert_eq!(json["updatedAt"], 2000);
    }

    #[test]
    fn test_session_view_logged_out_placeholder() {
        let view = SessionView::logged_out();
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["isLoggedIn"], false);
        assert!(json["userId"].is_null());
        assert_eq!(json["email"], "");
        assert_eq!(json["name"], "");
    }

    #[test]
    fn test_login_view_carries_token_and_identity() {
        let view = LoginView {
            session_token: "abc123".into(),
            user: SessionView {
                is_logged_in: true,
                user_id: Some(UserId(4)),
                email: "a@b.io".into(),
                name: "Ann".into(),
            },
        };
        let json: serde_json::Value = serde_json::to_value(&view).unwrap();

        assert_eq!(json["sessionToken"], "abc123");
        assert_eq!(json["user"]["isLoggedIn"], true);
        assert_eq!(json["user"]["userId"], 4);
    }

    // =====================================================================
    // Topics and change events
    // =====================================================================

    #[test]
    fn test_topic_wire_names_are_camel_case() {
        let json = serde_json::to_string(&Topic::UpsertPlayer).unwrap();
        assert_eq!(json, "\"upsertPlayer\"");

        let json = serde_json::to_string(&Topic::DeletePlayer).unwrap();
        assert_eq!(json, "\"deletePlayer\"");
    }

    #[test]
    fn test_topic_display_matches_wire_name() {
        assert_eq!(Topic::UpsertPlayer.to_string(), "upsertPlayer");
        assert_eq!(Topic::DeletePlayer.to_string(), "deletePlayer");
    }

    #[test]
    fn test_change_event_round_trip() {
        let event = ChangeEvent {
            topic: Topic::DeletePlayer,
            player: PlayerView {
                player_id: PlayerId(5),
                name: "Bea".into(),
                score: 3,
                created_at: 1,
                updated_at: 2,
            },
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ChangeEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    // =====================================================================
    // Operations — internally tagged JSON
    // =====================================================================

    #[test]
    fn test_operation_create_player_json_format() {
        let op = Operation::CreatePlayer {
            name: "Ann".into(),
            score: 10,
        };
        let json: serde_json::Value = serde_json::to_value(&op).unwrap();

        assert_eq!(json["type"], "CreatePlayer");
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["score"], 10);
    }

    #[test]
    fn test_operation_update_player_uses_camel_case_fields() {
        let op = Operation::UpdatePlayer {
            player_id: PlayerId(2),
            name: "Ann".into(),
            score: 11,
        };
        let json: serde_json::Value = serde_json::to_value(&op).unwrap();

        assert_eq!(json["type"], "UpdatePlayer");
        assert_eq!(json["playerId"], 2);
    }

    #[test]
    fn test_operation_subscribe_round_trip() {
        let op = Operation::Subscribe {
            topic: Topic::UpsertPlayer,
        };
        let bytes = serde_json::to_vec(&op).unwrap();
        let decoded: Operation = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(op, decoded);
    }

    #[test]
    fn test_operation_login_round_trip() {
        let op = Operation::Login {
            email: "a@b.io".into(),
            password: "secret".into(),
        };
        let bytes = serde_json::to_vec(&op).unwrap();
        let decoded: Operation = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(op, decoded);
    }

    #[test]
    fn test_operation_unknown_type_returns_error() {
        let unknown = r#"{"type": "DropAllTables"}"#;
        let result: Result<Operation, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    // =====================================================================
    // Envelopes
    // =====================================================================

    #[test]
    fn test_request_session_defaults_to_none() {
        // Clients that have never logged in simply omit the field.
        let json = r#"{"id": 1, "op": {"type": "GetAllPlayers"}}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, 1);
        assert!(req.session.is_none());
    }

    #[test]
    fn test_request_round_trip_with_session() {
        let req = Request {
            id: 9,
            session: Some("token".into()),
            op: Operation::Logout,
        };
        let bytes = serde_json::to_vec(&req).unwrap();
        let decoded: Request = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn test_reply_data_has_empty_errors() {
        let reply = Reply::data(
            3,
            ResponseData::Message(Confirmation {
                message: "ok".into(),
            }),
        );
        assert!(reply.is_ok());

        let json: serde_json::Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["errors"], serde_json::json!([]));
    }

    #[test]
    fn test_reply_failure_carries_status_and_messages() {
        let reply = Reply::failure(
            4,
            WireError {
                message: "Invalid input.".into(),
                status: 422,
                data: vec![FieldMessage::new("Invalid Name.")],
            },
        );
        assert!(!reply.is_ok());

        let json: serde_json::Value = serde_json::to_value(&reply).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["status"], 422);
        assert_eq!(json["errors"][0]["data"][0]["message"], "Invalid Name.");
    }

    #[test]
    fn test_reply_event_reuses_subscription_id() {
        let reply = Reply::event(
            7,
            ChangeEvent {
                topic: Topic::UpsertPlayer,
                player: PlayerView {
                    player_id: PlayerId(1),
                    name: "Ann".into(),
                    score: 1,
                    created_at: 0,
                    updated_at: 0,
                },
            },
        );
        let json: serde_json::Value = serde_json::to_value(&reply).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["data"]["type"], "Event");
        assert_eq!(json["data"]["data"]["topic"], "upsertPlayer");
    }

    #[test]
    fn test_response_data_players_json_format() {
        let data = ResponseData::Players(vec![]);
        let json: serde_json::Value = serde_json::to_value(&data).unwrap();

        assert_eq!(json["type"], "Players");
        assert_eq!(json["data"], serde_json::json!([]));
    }

    #[test]
    fn test_wire_error_data_defaults_to_empty() {
        // Non-validation failures omit the field entirely.
        let json = r#"{"message": "Not authenticated.", "status": 401}"#;
        let err: WireError = serde_json::from_str(json).unwrap();
        assert!(err.data.is_empty());
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<Request, _> = serde_json::from_slice(garbage);
        assert!(result.is_err());
    }
}
