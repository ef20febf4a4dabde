//! Connection session state machine.
//!
//! One session owns one logical connection lifecycle: connect, send the
//! pending subscription frames, run the receive loop, answer keepalive
//! pings, and terminate on the lifetime timer, caller cancellation, or a
//! transport failure.
//!
//! ```text
//! Connecting ──connect ok──► Open ──timer / cancel / server close──► Closing ──► Closed
//!     │                       │                                         │
//!     └──connect err──► Failed ◄──────────transport error───────────────┘
//! ```
//!
//! The whole lifecycle runs inside a single Tokio task with one
//! `tokio::select!` loop, so the timer-driven close, caller cancellation,
//! and inbound errors are serialized by construction and cannot race into
//! inconsistent states. Every session emits exactly one terminal
//! [`SessionEvent`] — [`Closed`](SessionEvent::Closed) or
//! [`Failed`](SessionEvent::Failed) — and then drops its channel sender.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use crate::constants::CLOSE_GRACE_SECS;
use crate::error::BirdeyeError;
use crate::types::feed::FeedMessage;

// ---------------------------------------------------------------------------
// Public event types
// ---------------------------------------------------------------------------

/// Lifecycle state of a connection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The connect attempt is in flight.
    Connecting,
    /// Connected; subscriptions sent; receiving frames.
    Open,
    /// A close was requested; draining until the server acknowledges.
    Closing,
    /// Terminal: the session ended cleanly.
    Closed,
    /// Terminal: the session ended on an unrecoverable transport error.
    Failed,
}

/// Why a session closed cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The configured maximum session lifetime elapsed.
    Timeout,
    /// The caller requested cancellation.
    Cancelled,
    /// The server ended the connection with a close handshake.
    Server,
}

/// A session lifecycle notification.
#[derive(Debug)]
pub enum SessionEvent {
    /// The transport connected and all subscription frames were sent.
    Connected,
    /// The session ended cleanly. Emitted exactly once per session.
    Closed(CloseReason),
    /// The session ended on an error. Emitted exactly once per session.
    Failed(BirdeyeError),
}

/// What a [`FeedStream`](crate::ws::client::FeedStream) yields: either a
/// lifecycle notification or a decoded feed message.
#[derive(Debug)]
pub enum StreamMessage {
    /// A session lifecycle notification.
    Session(SessionEvent),
    /// A decoded server push, in receive order.
    Feed(FeedMessage),
}

// ---------------------------------------------------------------------------
// Session task
// ---------------------------------------------------------------------------

/// Everything a session task needs, prepared by the client before spawn.
pub(crate) struct SessionConfig {
    /// Prepared handshake request (URL + subprotocol header).
    pub request: Request,
    /// Pre-encoded subscription frames, sent in order on connect.
    pub frames: Vec<String>,
    /// Maximum session lifetime, measured from the moment the transport
    /// opens.
    pub lifetime: Duration,
}

fn transition(state: &mut SessionState, next: SessionState) {
    tracing::debug!(from = ?state, to = ?next, "session state");
    *state = next;
}

/// Run one session to completion.
///
/// `events` delivers feed messages and lifecycle notifications to the
/// caller; `cancel` flips to `true` when any cancel handle fires. The task
/// returns once a terminal state is reached and all resources are released.
pub(crate) async fn run(
    config: SessionConfig,
    events: mpsc::Sender<StreamMessage>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut state = SessionState::Connecting;

    let (ws, _resp) = match connect_async(config.request).await {
        Ok(ok) => ok,
        Err(e) => {
            transition(&mut state, SessionState::Failed);
            // The rendered error can include the request URL, and the URL
            // carries the API key; log only the error kind.
            tracing::error!(kind = error_kind(&e), "WebSocket connect failed");
            let _ = events
                .send(StreamMessage::Session(SessionEvent::Failed(
                    BirdeyeError::Connect(e),
                )))
                .await;
            return;
        }
    };

    transition(&mut state, SessionState::Open);
    tracing::info!("feed WebSocket connected");

    let (mut write, mut read) = ws.split();

    // Subscriptions are fire-and-forget: activation is implicit server-side.
    for frame in &config.frames {
        if let Err(e) = write.send(Message::Text(frame.clone().into())).await {
            fail(&mut state, &events, e).await;
            return;
        }
        tracing::debug!(bytes = frame.len(), "subscription frame sent");
    }

    let _ = events
        .send(StreamMessage::Session(SessionEvent::Connected))
        .await;

    // Lifetime is measured from the moment the transport opens.
    let deadline = tokio::time::sleep(config.lifetime);
    tokio::pin!(deadline);

    // Set to false once every cancel handle is dropped, so the closed
    // watch channel cannot spin the select loop.
    let mut cancel_open = true;

    let reason = loop {
        tokio::select! {
            _ = &mut deadline => {
                break CloseReason::Timeout;
            }

            changed = cancel.changed(), if cancel_open => {
                match changed {
                    Ok(()) if *cancel.borrow() => break CloseReason::Cancelled,
                    Ok(()) => {}
                    Err(_) => cancel_open = false,
                }
            }

            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match FeedMessage::decode(text.as_str()) {
                        Ok(message) => {
                            tracing::trace!(kind = message.kind(), "feed message");
                            if events.send(StreamMessage::Feed(message)).await.is_err() {
                                // Receiver gone; nobody is listening.
                                break CloseReason::Cancelled;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, bytes = text.len(),
                                "dropping undecodable frame");
                        }
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    if let Err(e) = write.send(Message::Pong(payload)).await {
                        fail(&mut state, &events, e).await;
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) => break CloseReason::Server,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    fail(&mut state, &events, e).await;
                    return;
                }
                None => break CloseReason::Server,
            }
        }
    };

    transition(&mut state, SessionState::Closing);
    tracing::info!(reason = ?reason, "closing feed session");

    match write.send(Message::Close(None)).await {
        Ok(()) => {}
        Err(e) if is_already_closed(&e) => {}
        Err(e) => {
            fail(&mut state, &events, e).await;
            return;
        }
    }

    // Drain until the server acknowledges the close, bounded by a grace
    // period. Frames arriving after close was requested are not forwarded.
    let grace = tokio::time::sleep(Duration::from_secs(CLOSE_GRACE_SECS));
    tokio::pin!(grace);
    loop {
        tokio::select! {
            _ = &mut grace => break,
            incoming = read.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) if is_already_closed(&e) => break,
                Some(Err(e)) => {
                    fail(&mut state, &events, e).await;
                    return;
                }
            }
        }
    }

    transition(&mut state, SessionState::Closed);
    let _ = events
        .send(StreamMessage::Session(SessionEvent::Closed(reason)))
        .await;
}

/// Enter the terminal `Failed` state and emit the single failure event.
async fn fail(state: &mut SessionState, events: &mpsc::Sender<StreamMessage>, error: WsError) {
    transition(state, SessionState::Failed);
    tracing::error!(error = %error, "feed session transport error");
    let _ = events
        .send(StreamMessage::Session(SessionEvent::Failed(
            BirdeyeError::Transport(error),
        )))
        .await;
}

/// Whether a transport error merely reports that the connection already
/// completed its close handshake (not a failure).
fn is_already_closed(error: &WsError) -> bool {
    matches!(error, WsError::ConnectionClosed | WsError::AlreadyClosed)
}

/// A coarse error category safe to log. Connect errors are never rendered
/// in full because `Url` and `Http` variants can echo the credentialed URL.
fn error_kind(error: &WsError) -> &'static str {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => "closed",
        WsError::Io(_) => "io",
        WsError::Tls(_) => "tls",
        WsError::Capacity(_) => "capacity",
        WsError::Protocol(_) => "protocol",
        WsError::Url(_) => "url",
        WsError::Http(_) => "http",
        WsError::HttpFormat(_) => "http-format",
        _ => "other",
    }
}
