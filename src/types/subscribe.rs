//! Outbound subscription requests and their wire encoding.
//!
//! Every [`SubscriptionRequest`] serializes to exactly one outbound JSON
//! frame of the shape `{"type": "SUBSCRIBE_*", "data": {...}}` (the
//! new-pair subscription carries no `data` at all). Encoding is a pure
//! function: deterministic, byte-stable, and validated before any network
//! I/O happens.

use serde::Serialize;

use crate::constants::{DEFAULT_CHART_TYPE, DEFAULT_CURRENCY, PAIR_CURRENCY};
use crate::error::{BirdeyeError, Result};

// ---------------------------------------------------------------------------
// Complex queries
// ---------------------------------------------------------------------------

/// One token's predicate inside a [`ComplexQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPredicate {
    /// Token address.
    pub address: String,
    /// Candle interval, e.g. `"1m"`. Only used by price subscriptions.
    pub chart_type: String,
    /// Quote currency, e.g. `"usd"`. Only used by price subscriptions.
    pub currency: String,
}

impl TokenPredicate {
    /// Create a predicate with the default chart type and currency.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chart_type: DEFAULT_CHART_TYPE.to_owned(),
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }

    /// Override the candle interval.
    pub fn chart_type(mut self, chart_type: impl Into<String>) -> Self {
        self.chart_type = chart_type.into();
        self
    }

    /// Override the quote currency.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// A boolean OR-combination of per-token predicates, used to subscribe to
/// many addresses in one request.
///
/// A complex query must reference at least one token; an empty query is
/// rejected at encode time with [`BirdeyeError::InvalidRequest`] rather than
/// silently sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexQuery {
    tokens: Vec<TokenPredicate>,
}

impl ComplexQuery {
    /// Create an empty query. Push at least one predicate before encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from a list of addresses with default chart/currency.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: addresses.into_iter().map(TokenPredicate::new).collect(),
        }
    }

    /// Append a token predicate.
    pub fn token(mut self, predicate: TokenPredicate) -> Self {
        self.tokens.push(predicate);
        self
    }

    /// Number of token predicates in the query.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the query has no predicates (and would fail to encode).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Render the price-feed form:
    /// `(address = A AND chartType = T AND currency = C) OR (…)`.
    fn render_price(&self) -> String {
        self.tokens
            .iter()
            .map(|t| {
                format!(
                    "(address = {} AND chartType = {} AND currency = {})",
                    t.address, t.chart_type, t.currency
                )
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// Render the transaction-feed form: `address = A OR address = B`.
    fn render_txs(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("address = {}", t.address))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    fn validate(&self, feed: &str) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(BirdeyeError::InvalidRequest(format!(
                "{feed} complex query must contain at least one token predicate"
            )));
        }
        for t in &self.tokens {
            if t.address.is_empty() {
                return Err(BirdeyeError::InvalidRequest(format!(
                    "{feed} complex query contains a predicate with an empty address"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subscription requests
// ---------------------------------------------------------------------------

/// A declaration of interest in one feed.
///
/// Construct via the convenience methods ([`price`](Self::price),
/// [`txs`](Self::txs), …) for the common defaults, or build variants
/// directly for full control.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionRequest {
    /// New trading pairs as they appear on-chain.
    NewPair,
    /// OHLCV candles for a single token or pair address.
    Price {
        /// Token address (or pair address with `currency: "pair"`).
        address: String,
        /// Candle interval, e.g. `"1m"`.
        chart_type: String,
        /// Quote currency: `"usd"` for tokens, `"pair"` for pair addresses.
        currency: String,
    },
    /// OHLCV candles for many tokens in one request.
    PriceMulti(ComplexQuery),
    /// Candles for an explicit base/quote token pairing.
    BaseQuotePrice {
        /// Base token address.
        base_address: String,
        /// Quote token address.
        quote_address: String,
        /// Candle interval, e.g. `"1m"`.
        chart_type: String,
    },
    /// Transactions touching a single token address.
    Txs {
        /// Token address.
        address: String,
    },
    /// Transactions on a single pair address.
    TxsPair {
        /// Pair (market) address.
        pair_address: String,
    },
    /// Transactions for many token addresses in one request.
    TxsMulti(ComplexQuery),
    /// All transactions involving a wallet.
    WalletTxs {
        /// Wallet address.
        address: String,
    },
}

impl SubscriptionRequest {
    /// Price candles for a token address, quoted in USD at the default
    /// interval.
    pub fn price(address: impl Into<String>) -> Self {
        Self::Price {
            address: address.into(),
            chart_type: DEFAULT_CHART_TYPE.to_owned(),
            currency: DEFAULT_CURRENCY.to_owned(),
        }
    }

    /// Price candles for a pair address, quoted against the pair itself.
    pub fn price_pair(pair_address: impl Into<String>) -> Self {
        Self::Price {
            address: pair_address.into(),
            chart_type: DEFAULT_CHART_TYPE.to_owned(),
            currency: PAIR_CURRENCY.to_owned(),
        }
    }

    /// Transactions touching a token address.
    pub fn txs(address: impl Into<String>) -> Self {
        Self::Txs {
            address: address.into(),
        }
    }

    /// Transactions on a pair address.
    pub fn txs_pair(pair_address: impl Into<String>) -> Self {
        Self::TxsPair {
            pair_address: pair_address.into(),
        }
    }

    /// All transactions involving a wallet address.
    pub fn wallet_txs(address: impl Into<String>) -> Self {
        Self::WalletTxs {
            address: address.into(),
        }
    }

    /// The outbound `type` discriminator for this request.
    pub fn ws_type(&self) -> &'static str {
        match self {
            Self::NewPair => "SUBSCRIBE_NEW_PAIR",
            Self::Price { .. } | Self::PriceMulti(_) => "SUBSCRIBE_PRICE",
            Self::BaseQuotePrice { .. } => "SUBSCRIBE_BASE_QUOTE_PRICE",
            Self::Txs { .. } | Self::TxsPair { .. } | Self::TxsMulti(_) => "SUBSCRIBE_TXS",
            Self::WalletTxs { .. } => "SUBSCRIBE_WALLET_TXS",
        }
    }

    /// Encode the request to its outbound text frame.
    ///
    /// Pure and deterministic: the same request always encodes to
    /// byte-identical output. Fails with [`BirdeyeError::InvalidRequest`] if
    /// a complex query is empty or a required address field is an empty
    /// string; validation happens before any serialization.
    pub fn encode(&self) -> Result<String> {
        self.validate()?;

        let kind = self.ws_type();
        let json = match self {
            Self::NewPair => serde_json::to_string(&Frame::<()> { kind, data: None })?,

            Self::Price {
                address,
                chart_type,
                currency,
            } => serde_json::to_string(&Frame {
                kind,
                data: Some(SimplePricePayload {
                    query_type: QUERY_SIMPLE,
                    chart_type,
                    address,
                    currency,
                }),
            })?,

            Self::PriceMulti(query) => serde_json::to_string(&Frame {
                kind,
                data: Some(ComplexPayload {
                    query_type: QUERY_COMPLEX,
                    query: query.render_price(),
                }),
            })?,

            Self::BaseQuotePrice {
                base_address,
                quote_address,
                chart_type,
            } => serde_json::to_string(&Frame {
                kind,
                data: Some(BaseQuotePayload {
                    base_address,
                    quote_address,
                    chart_type,
                }),
            })?,

            Self::Txs { address } => serde_json::to_string(&Frame {
                kind,
                data: Some(SimpleTxsPayload {
                    query_type: QUERY_SIMPLE,
                    address: Some(address),
                    pair_address: None,
                }),
            })?,

            Self::TxsPair { pair_address } => serde_json::to_string(&Frame {
                kind,
                data: Some(SimpleTxsPayload {
                    query_type: QUERY_SIMPLE,
                    address: None,
                    pair_address: Some(pair_address),
                }),
            })?,

            Self::TxsMulti(query) => serde_json::to_string(&Frame {
                kind,
                data: Some(ComplexPayload {
                    query_type: QUERY_COMPLEX,
                    query: query.render_txs(),
                }),
            })?,

            Self::WalletTxs { address } => serde_json::to_string(&Frame {
                kind,
                data: Some(WalletPayload { address }),
            })?,
        };

        Ok(json)
    }

    fn validate(&self) -> Result<()> {
        let require = |field: &str, value: &str| -> Result<()> {
            if value.is_empty() {
                Err(BirdeyeError::InvalidRequest(format!(
                    "{} requires a non-empty {field}",
                    self.ws_type()
                )))
            } else {
                Ok(())
            }
        };

        match self {
            Self::NewPair => Ok(()),
            Self::Price {
                address,
                chart_type,
                ..
            } => {
                require("address", address)?;
                require("chartType", chart_type)
            }
            Self::PriceMulti(query) => query.validate("price"),
            Self::BaseQuotePrice {
                base_address,
                quote_address,
                chart_type,
            } => {
                require("baseAddress", base_address)?;
                require("quoteAddress", quote_address)?;
                require("chartType", chart_type)
            }
            Self::Txs { address } => require("address", address),
            Self::TxsPair { pair_address } => require("pairAddress", pair_address),
            Self::TxsMulti(query) => query.validate("txs"),
            Self::WalletTxs { address } => require("address", address),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

const QUERY_SIMPLE: &str = "simple";
const QUERY_COMPLEX: &str = "complex";

/// Outbound frame envelope. `data` is omitted entirely when absent.
#[derive(Debug, Serialize)]
struct Frame<T: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimplePricePayload<'a> {
    query_type: &'static str,
    chart_type: &'a str,
    address: &'a str,
    currency: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComplexPayload {
    query_type: &'static str,
    query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BaseQuotePayload<'a> {
    base_address: &'a str,
    quote_address: &'a str,
    chart_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimpleTxsPayload<'a> {
    query_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pair_address: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletPayload<'a> {
    address: &'a str,
}
