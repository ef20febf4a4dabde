//! Constants for the Birdeye WebSocket feed.
//!
//! Contains the endpoint template, protocol values, and default
//! subscription/session parameters. These are used internally by
//! [`StreamingClient`](crate::ws::client::StreamingClient) and the session
//! machinery, but are also exported for advanced usage.

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Base WebSocket endpoint. The chain segment and `x-api-key` query parameter
/// are appended per connection: `{WS_BASE_URL}/{chain}?x-api-key={key}`.
pub const WS_BASE_URL: &str = "wss://public-api.birdeye.so/socket";

/// WebSocket subprotocol required by the feed server.
pub const WS_SUBPROTOCOL: &str = "echo-protocol";

/// `Origin` value sent during the handshake. The feed server expects this
/// exact value regardless of the connecting host.
pub const WS_ORIGIN: &str = "ws://public-api.birdeye.so";

/// Chain used when the caller does not specify one.
pub const DEFAULT_CHAIN: &str = "solana";

// ---------------------------------------------------------------------------
// Subscription defaults
// ---------------------------------------------------------------------------

/// Default candle interval for price subscriptions.
pub const DEFAULT_CHART_TYPE: &str = "1m";

/// Default quote currency for price subscriptions.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Currency value that quotes a price subscription against the pair itself
/// rather than USD (used when subscribing by pair address).
pub const PAIR_CURRENCY: &str = "pair";

// ---------------------------------------------------------------------------
// Session limits
// ---------------------------------------------------------------------------

/// Default maximum session lifetime in seconds (1 hour).
///
/// The session transitions to `Closing` when this elapses, regardless of
/// traffic. Price and transaction feeds use this cap.
pub const SESSION_LIFETIME_SECS: u64 = 3_600;

/// Extended session lifetime in seconds (24 hours), suitable for the
/// new-pair feed which is typically left running unattended.
pub const NEW_PAIR_SESSION_LIFETIME_SECS: u64 = 86_400;

/// Grace period in seconds to wait for the server's close acknowledgment
/// before the session releases the transport anyway.
pub const CLOSE_GRACE_SECS: u64 = 5;

/// Default capacity of the event channel between the session task and the
/// caller's [`FeedStream`](crate::ws::client::FeedStream).
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;
