//! Per-connection handler: room commands and message routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Spawn a writer task draining this connection's outbound channel
//!   2. Loop: receive frames → decode → create/join a room, or route
//!      into the bound room
//!   3. On exit, a drop guard frees the seat and the registry entry
//!
//! Room actors never see sockets — they push [`ServerMessage`]s into
//! the outbound channel and the writer task does the encoding and I/O.

use std::sync::Arc;

use molerush_protocol::{
    ClientMessage, Codec, RoomCode, Seat, ServerMessage,
};
use molerush_room::{RoomError, RoomHandle};
use molerush_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::{Mutex, mpsc};

use crate::MolerushError;
use crate::server::ServerState;

/// A connection's membership in a room.
struct Binding {
    code: RoomCode,
    seat: Seat,
    handle: RoomHandle,
}

/// Drop guard that frees a connection's seat when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, it spawns a fire-and-forget task for the async work.
struct DisconnectGuard<C: Codec> {
    conn_id: ConnectionId,
    binding: Arc<Mutex<Option<Binding>>>,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let binding = Arc::clone(&self.binding);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let Some(bound) = binding.lock().await.take() else {
                return;
            };
            tracing::debug!(%conn_id, room = %bound.code, "freeing seat");
            let _ = bound.handle.disconnect(bound.seat).await;
            state.registry.lock().await.remove(&bound.code);
        });
    }
}

/// The error text shown to clients for a failed join.
fn join_error_text(err: &RoomError) -> String {
    match err {
        RoomError::Full(_) => "Room is full".to_string(),
        // A dead actor is indistinguishable from no room at all.
        RoomError::NotFound(_) | RoomError::Unavailable(_) => {
            "Room not found".to_string()
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), MolerushError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // Outbound path: room actors (and this handler) push messages into
    // the channel; the writer owns encoding and socket writes.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer = {
        let conn = Arc::clone(&conn);
        let codec = state.codec.clone();
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let bytes = match codec.encode(&msg) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(
                            %conn_id, error = %e, "encode failed"
                        );
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        })
    };

    let binding = Arc::new(Mutex::new(None::<Binding>));
    let _guard = DisconnectGuard {
        conn_id,
        binding: Arc::clone(&binding),
        state: Arc::clone(&state),
    };

    loop {
        let data = match conn.recv().await {
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

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                // Malformed frames are dropped, not fatal.
                tracing::debug!(
                    %conn_id, error = %e, "undecodable message dropped"
                );
                continue;
            }
        };

        match msg {
            ClientMessage::CreateRoom => {
                let mut slot = binding.lock().await;
                if slot.is_some() {
                    let _ = out_tx.send(ServerMessage::Error {
                        message: "Already in a room".to_string(),
                    });
                    continue;
                }

                let handle =
                    state.registry.lock().await.create(out_tx.clone());
                let code = handle.code().clone();
                let _ = out_tx.send(ServerMessage::RoomCreated {
                    code: code.clone(),
                });
                *slot = Some(Binding {
                    code,
                    seat: Seat::Host,
                    handle,
                });
            }

            ClientMessage::JoinRoom { code } => {
                let mut slot = binding.lock().await;
                if slot.is_some() {
                    let _ = out_tx.send(ServerMessage::Error {
                        message: "Already in a room".to_string(),
                    });
                    continue;
                }

                // Codes are entered by hand; accept any case.
                let code = RoomCode(code.trim().to_uppercase());
                let handle =
                    match state.registry.lock().await.get(&code) {
                        Ok(handle) => handle,
                        Err(e) => {
                            let _ = out_tx.send(ServerMessage::Error {
                                message: join_error_text(&e),
                            });
                            continue;
                        }
                    };

                match handle.join(out_tx.clone()).await {
                    Ok(seat) => {
                        *slot = Some(Binding { code, seat, handle });
                    }
                    Err(e) => {
                        if matches!(e, RoomError::Unavailable(_)) {
                            state.registry.lock().await.remove(&code);
                        }
                        let _ = out_tx.send(ServerMessage::Error {
                            message: join_error_text(&e),
                        });
                    }
                }
            }

            // Everything else is meaningful only inside a room.
            in_room => {
                let mut slot = binding.lock().await;
                let stale = match slot.as_ref() {
                    Some(bound) => bound
                        .handle
                        .send_message(bound.seat, in_room)
                        .await
                        .is_err(),
                    None => {
                        tracing::debug!(
                            %conn_id,
                            "message outside a room, ignoring"
                        );
                        false
                    }
                };
                // The room actor is gone (opponent left); free the
                // binding so this client can create or join again.
                if stale {
                    if let Some(bound) = slot.take() {
                        state.registry.lock().await.remove(&bound.code);
                    }
                }
            }
        }
    }

    writer.abort();
    let _ = conn.close().await;
    // _guard drops here → seat and registry cleanup fire.
    Ok(())
}
