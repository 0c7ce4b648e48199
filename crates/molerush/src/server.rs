//! `MolerushServer` builder and accept loop.
//!
//! This is the entry point for running a molerush server. It ties
//! together all the layers: transport → protocol → room.

use std::sync::Arc;

use molerush_game::GameConfig;
use molerush_protocol::{Codec, JsonCodec};
use molerush_room::RoomRegistry;
use molerush_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::MolerushError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry is the only cross-connection state; everything match-scoped
/// lives inside room actors.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a molerush server.
///
/// # Example
///
/// ```rust,ignore
/// let server = MolerushServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct MolerushServerBuilder {
    bind_addr: String,
    game_config: GameConfig,
}

impl MolerushServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            game_config: GameConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the match configuration new rooms inherit.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.game_config = config;
        self
    }

    /// Builds the server, binding the listener.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` — the wire format the
    /// browser client speaks.
    pub async fn build(
        self,
    ) -> Result<MolerushServer<JsonCodec>, MolerushError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(self.game_config)),
            codec: JsonCodec,
        });

        Ok(MolerushServer { transport, state })
    }
}

impl Default for MolerushServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running molerush server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MolerushServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec + Clone> MolerushServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, MolerushError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Each accepted connection gets its own handler task. Runs until
    /// the process is terminated.
    pub async fn run(mut self) -> Result<(), MolerushError> {
        tracing::info!("molerush server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
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
