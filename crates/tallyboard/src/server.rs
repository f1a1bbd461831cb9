//! `Server` builder and accept loop.
//!
//! This is the entry point for running a Tallyboard server. It wires the
//! layers together: transport → protocol → resolver → (store, sessions,
//! event bus) — and spawns one handler task per connection plus one
//! background task sweeping expired sessions.

use std::sync::Arc;
use std::time::Duration;

use tallyboard_protocol::JsonCodec;
use tallyboard_resolver::{EventBus, Resolver};
use tallyboard_session::{SessionConfig, SessionStore};
use tallyboard_store::DocumentStore;
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::websocket::WsListener;
use crate::TallyboardError;

/// How often abandoned sessions are swept out.
const SESSION_SWEEP_SECS: u64 = 60;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S> {
    pub(crate) resolver: Resolver<S>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a server.
///
/// The store is injected at [`build`](Self::build); the event bus can be
/// injected too, which is how tests (or an embedding application) keep a
/// handle for their own publishing or observation. Defaults: loopback
/// bind, 15-minute session TTL, a fresh bus.
pub struct ServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    bus: Option<EventBus>,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_config: SessionConfig::default(),
            bus: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Injects an externally constructed event bus instead of the
    /// default fresh one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Binds the listener and assembles the server around the given
    /// store.
    pub async fn build<S: DocumentStore>(
        self,
        store: Arc<S>,
    ) -> Result<Server<S>, TallyboardError> {
        let listener = WsListener::bind(&self.bind_addr).await?;

        let sessions = Arc::new(Mutex::new(SessionStore::new(self.session_config)));
        let bus = self.bus.unwrap_or_default();
        let resolver = Resolver::new(store, Arc::clone(&sessions), bus);

        Ok(Server {
            listener,
            sessions,
            state: Arc::new(ServerState {
                resolver,
                codec: JsonCodec,
            }),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Tallyboard server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server<S> {
    listener: WsListener,
    sessions: Arc<Mutex<SessionStore>>,
    state: Arc<ServerState<S>>,
}

impl<S: DocumentStore> Server<S> {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// The resolver this server dispatches into (useful for embedding).
    pub fn resolver(&self) -> &Resolver<S> {
        &self.state.resolver
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Each accepted connection gets its own handler task; the session
    /// sweep runs on its own interval task for the server's lifetime.
    pub async fn run(self) -> Result<(), TallyboardError> {
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_SWEEP_SECS));
            loop {
                interval.tick().await;
                sessions.lock().await.expire_stale();
            }
        });

        tracing::info!("Tallyboard server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
