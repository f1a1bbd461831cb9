//! Per-connection handler: request dispatch and subscription streaming.
//!
//! Each accepted connection gets its own task running this handler. The
//! loop serves two sources at once:
//!
//!   1. Incoming frames — decoded to [`Request`], dispatched to the
//!      resolver, answered with exactly one [`Reply`].
//!   2. The outbound queue — event frames pushed by this connection's
//!      subscription forwarder tasks.
//!
//! A `Subscribe` op spawns a forwarder that copies matching bus events
//! into the outbound queue tagged with the subscribing request's id.
//! Subscriptions live exactly as long as the connection: when the loop
//! exits, every forwarder is aborted and the bus receivers drop.

use std::sync::Arc;

use tallyboard_protocol::{Codec, Operation, Reply, Request, ResponseData};
use tallyboard_resolver::ResolverError;
use tallyboard_store::DocumentStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::server::ServerState;
use crate::websocket::WsConnection;
use crate::TallyboardError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S: DocumentStore>(
    conn: WsConnection,
    state: Arc<ServerState<S>>,
) -> Result<(), TallyboardError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // Forwarder tasks push event frames here; the loop below owns the
    // writing half of the connection.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Reply>();
    let mut forwarders: Vec<JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            incoming = conn.recv() => {
                let data = match incoming {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::debug!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };

                // An undecodable frame can't be answered (no id to echo),
                // so it is logged and skipped.
                let request: Request = match state.codec.decode(&data) {
                    Ok(req) => req,
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "failed to decode request");
                        continue;
                    }
                };

                let reply = dispatch(&state, request, &out_tx, &mut forwarders).await;
                let bytes = state.codec.encode(&reply)?;
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%conn_id, error = %e, "send failed");
                    break;
                }
            }

            Some(reply) = out_rx.recv() => {
                let bytes = state.codec.encode(&reply)?;
                if let Err(e) = conn.send(&bytes).await {
                    tracing::debug!(%conn_id, error = %e, "event send failed");
                    break;
                }
            }
        }
    }

    // Connection gone: drop every subscription with it.
    for forwarder in forwarders {
        forwarder.abort();
    }
    Ok(())
}

/// Dispatches one request to the resolver and shapes the reply.
///
/// Application failures become error payloads with the request's id —
/// from the transport's point of view this function cannot fail.
async fn dispatch<S: DocumentStore>(
    state: &Arc<ServerState<S>>,
    request: Request,
    out_tx: &mpsc::UnboundedSender<Reply>,
    forwarders: &mut Vec<JoinHandle<()>>,
) -> Reply {
    let id = request.id;
    let token = request.session.as_deref();
    let resolver = &state.resolver;

    let result: Result<ResponseData, ResolverError> = match request.op {
        Operation::GetAllPlayers => {
            resolver.get_all_players().await.map(ResponseData::Players)
        }

        Operation::Session => Ok(ResponseData::Session(resolver.session(token).await)),

        Operation::CreatePlayer { name, score } => resolver
            .create_player(token, name, score)
            .await
            .map(ResponseData::Player),

        Operation::UpdatePlayer {
            player_id,
            name,
            score,
        } => resolver
            .update_player(token, player_id, name, score)
            .await
            .map(ResponseData::Player),

        Operation::DeletePlayer { player_id } => resolver
            .delete_player(token, player_id)
            .await
            .map(ResponseData::Player),

        Operation::CreateUser {
            email,
            password,
            name,
        } => resolver
            .create_user(email, password, name)
            .await
            .map(ResponseData::User),

        Operation::Login { email, password } => resolver
            .login(email, password)
            .await
            .map(ResponseData::LoggedIn),

        Operation::Logout => resolver.logout(token).await.map(ResponseData::Message),

        Operation::Subscribe { topic } => {
            let mut subscription = resolver.subscribe(topic);
            let out = out_tx.clone();
            forwarders.push(tokio::spawn(async move {
                while let Some(event) = subscription.recv().await {
                    // Receiver gone means the connection is closing.
                    if out.send(Reply::event(id, event)).is_err() {
                        break;
                    }
                }
            }));
            Ok(ResponseData::Subscribed { topic })
        }
    };

    match result {
        Ok(data) => Reply::data(id, data),
        Err(error) => {
            // Internal failures get their detail logged here; the wire
            // only carries the generic message.
            if let ResolverError::Internal(_) = &error {
                tracing::error!(request_id = id, error = ?error, "internal error");
            }
            Reply::failure(id, error.to_wire())
        }
    }
}
