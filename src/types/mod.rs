//! Typed representations of the feed wire protocol.
//!
//! ## Organization
//!
//! - [`subscribe`] — Outbound subscription requests and their frame encoding
//! - [`feed`] — Inbound feed messages and the frame decoder
//!
//! The most commonly used types are re-exported at the module root.

pub mod feed;
pub mod subscribe;

pub use feed::{DecodeError, FeedMessage};
pub use subscribe::{ComplexQuery, SubscriptionRequest, TokenPredicate};
