//! Error types for the `birdeye-ws` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, BirdeyeError>`.
//!
//! [`BirdeyeError`] covers:
//! - **Invalid requests** — Client-side validation failures, rejected before
//!   any network I/O
//! - **Connect failures** — The WebSocket session could not be established
//! - **Transport errors** — Mid-session I/O failures on an open connection
//! - **Decode errors** — A single inbound frame could not be interpreted
//! - **JSON errors** — Serialization failures on outbound frames
//! - **URL errors** — Malformed endpoint construction
//!
//! A session that ends because its configured lifetime elapsed is *not* an
//! error; it surfaces as a normal [`SessionEvent::Closed`] with
//! [`CloseReason::Timeout`].
//!
//! [`SessionEvent::Closed`]: crate::ws::session::SessionEvent::Closed
//! [`CloseReason::Timeout`]: crate::ws::session::CloseReason::Timeout

use crate::types::feed::DecodeError;

/// All possible errors produced by the `birdeye-ws` client.
#[derive(Debug, thiserror::Error)]
pub enum BirdeyeError {
    /// The caller supplied a subscription that cannot be encoded, e.g. a
    /// complex query with no token predicates or an empty address.
    #[error("invalid subscription request: {0}")]
    InvalidRequest(String),

    /// The WebSocket session could not be established. Terminal for the
    /// attempt; the client never retries on its own.
    #[error("WebSocket connect failed: {0}")]
    Connect(tokio_tungstenite::tungstenite::Error),

    /// A transport-level failure on an already-open connection.
    #[error("WebSocket transport error: {0}")]
    Transport(tokio_tungstenite::tungstenite::Error),

    /// A single inbound frame could not be interpreted. The session itself
    /// logs and drops such frames; this variant only surfaces from explicit
    /// decode calls.
    #[error("frame decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Failed to serialize an outbound subscription frame.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error building or parsing the endpoint URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BirdeyeError>;
