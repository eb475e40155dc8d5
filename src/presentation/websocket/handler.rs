//! WebSocket Connection Handler
//!
//! Owns one chat session's full lifetime: join, concurrent inbound and
//! outbound relays, and teardown.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::messages::{ChatFrame, ErrorFrame};
use crate::domain::{ChatMessage, RegisteredSession, RegistryError};
use crate::startup::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection from open to close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // The session joins on its first frame, within the configured window.
    let join_timeout = Duration::from_secs(state.settings.room.join_timeout_secs);
    let first = match timeout(join_timeout, next_chat_frame(&mut receiver)).await {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            tracing::debug!("connection closed before joining");
            return;
        }
        Err(_) => {
            tracing::debug!("join timeout");
            send_error(&mut sender, "timed out waiting for a join frame").await;
            return;
        }
    };

    let username = first.username.trim().to_owned();
    if username.is_empty() || username.chars().count() > 32 {
        send_error(&mut sender, "username must be 1-32 characters").await;
        return;
    }

    let session = match state.room.join(&username) {
        Ok(session) => session,
        Err(RegistryError::Full) => {
            tracing::warn!(username = %username, "rejected connection, room full");
            send_error(&mut sender, "the room is full").await;
            return;
        }
    };

    tracing::info!(
        session_id = %session.id(),
        username = %session.username(),
        "user joined chat"
    );

    // Outbound relay drains the session queue onto the socket while this
    // task keeps draining inbound frames.
    let mut relay = tokio::spawn(outbound_relay(Arc::clone(&session), sender));

    // A join frame carrying "exit" joins and leaves in one step.
    if !first.is_exit() {
        if !first.text.is_empty() {
            publish_frame(&state, &session, &first.text);
        }
        relay_inbound(&mut receiver, &state, &session, &mut relay).await;
    }

    // Deregistration closes the outbound queue, which also lets the relay
    // task finish on its own.
    state.room.leave(&session);
    relay.abort();

    tracing::info!(
        session_id = %session.id(),
        username = %session.username(),
        "user left chat"
    );
}

/// Drain inbound frames until the peer closes, sends "exit", or the
/// outbound relay dies on a write error.
async fn relay_inbound(
    receiver: &mut SplitStream<WebSocket>,
    state: &AppState,
    session: &Arc<RegisteredSession>,
    relay: &mut JoinHandle<()>,
) {
    loop {
        tokio::select! {
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let frame: ChatFrame = match serde_json::from_str(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                tracing::debug!(
                                    session_id = %session.id(),
                                    error = %e,
                                    "ignoring malformed frame"
                                );
                                continue;
                            }
                        };
                        if frame.is_exit() {
                            break;
                        }
                        if frame.text.is_empty() {
                            continue;
                        }
                        publish_frame(state, session, &frame.text);
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(session_id = %session.id(), "connection closed");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong is answered by axum; binary frames are ignored.
                    }
                    Some(Err(e)) => {
                        tracing::debug!(session_id = %session.id(), error = %e, "websocket error");
                        break;
                    }
                }
            }

            // Outbound relay ended: a write error is local to this session
            // and closes it.
            _ = &mut *relay => break,
        }
    }
}

/// Stamp and publish one inbound message.
fn publish_frame(state: &AppState, session: &RegisteredSession, text: &str) {
    if text.chars().count() > state.settings.room.max_message_length {
        tracing::debug!(session_id = %session.id(), "dropping oversized message");
        return;
    }
    let message = ChatMessage::new(session.username(), text);
    state.room.publish(session.id(), message);
}

/// Forward queued messages to the peer in arrival order.
///
/// Ends when the queue closes (deregistration) or a write fails; a write
/// failure never propagates beyond this session.
async fn outbound_relay(session: Arc<RegisteredSession>, mut sender: SplitSink<WebSocket, Message>) {
    while let Some(message) = session.outbound().pop().await {
        let text = match serde_json::to_string(&*message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    session_id = %session.id(),
                    error = %e,
                    "failed to serialize message"
                );
                continue;
            }
        };
        if sender.send(Message::Text(text.into())).await.is_err() {
            tracing::debug!(session_id = %session.id(), "write failed, closing session");
            break;
        }
    }
}

/// Wait for the first parseable chat frame, skipping anything else.
async fn next_chat_frame(receiver: &mut SplitStream<WebSocket>) -> Option<ChatFrame> {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ChatFrame>(&text) {
                Ok(frame) => return Some(frame),
                Err(e) => tracing::debug!(error = %e, "ignoring malformed join frame"),
            },
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
    None
}

async fn send_error(sender: &mut SplitSink<WebSocket, Message>, reason: &str) {
    let frame = ErrorFrame::new(reason);
    if let Ok(text) = serde_json::to_string(&frame) {
        let _ = sender.send(Message::Text(text.into())).await;
    }
}
