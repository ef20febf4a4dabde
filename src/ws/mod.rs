//! WebSocket session and client machinery.
//!
//! ## [`client`] — Streaming client façade
//!
//! [`StreamingClient`](client::StreamingClient) turns a set of
//! [`SubscriptionRequest`](crate::types::subscribe::SubscriptionRequest)s
//! into a running session and hands back a
//! [`FeedStream`](client::FeedStream) of decoded messages.
//!
//! ## [`session`] — Connection session state machine
//!
//! One Tokio task per session drives the full lifecycle
//! (`Connecting → Open → Closing → Closed`, or `Failed`), answers keepalive
//! pings, enforces the lifetime cap, and guarantees exactly one terminal
//! [`SessionEvent`](session::SessionEvent).
//!
//! There is no reconnect: a dropped connection is terminal for its session,
//! and retry policy is the caller's.

pub mod client;
pub mod session;
