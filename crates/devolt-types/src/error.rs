//! Error types for the DeVolt settlement engine.
//!
//! All errors use the `DV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Auction errors
//! - 2xx: Bid errors
//! - 3xx: Order errors
//! - 4xx: Registry / directory errors (stations, tokens, users)
//! - 5xx: Deposit and wallet errors
//! - 6xx: Access errors
//! - 7xx: Codec errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the current input: no state is committed and no
//! voucher is emitted.

use thiserror::Error;

use crate::{Address, AuctionId, BidId, OrderId, StationId, Timestamp, U256};

/// Central error enum for all DeVolt operations.
#[derive(Debug, Error)]
pub enum DevoltError {
    // =================================================================
    // Auction Errors (1xx)
    // =================================================================
    /// The requested auction does not exist.
    #[error("DV_ERR_100: auction not found: {0}")]
    AuctionNotFound(AuctionId),

    /// The auction failed validation (non-positive amounts, bad expiry).
    #[error("DV_ERR_101: invalid auction: {reason}")]
    InvalidAuction { reason: String },

    /// No auction is currently in the `ongoing` state.
    #[error("DV_ERR_102: active auction not found")]
    NoActiveAuction,

    /// Another auction is already `ongoing`.
    #[error("DV_ERR_103: auction {0} is already ongoing")]
    AuctionAlreadyActive(AuctionId),

    /// The active auction's expiry has passed.
    #[error(
        "DV_ERR_104: active auction expired, cannot create bid \
         (expired at {expires_at}, now {now})"
    )]
    AuctionExpired { expires_at: Timestamp, now: Timestamp },

    /// The auction cannot be finished before its expiry.
    #[error("DV_ERR_105: auction {id} not expired yet (expires at {expires_at}, now {now})")]
    AuctionNotExpired {
        id: AuctionId,
        expires_at: Timestamp,
        now: Timestamp,
    },

    // =================================================================
    // Bid Errors (2xx)
    // =================================================================
    /// The requested bid does not exist.
    #[error("DV_ERR_200: bid not found: {0}")]
    BidNotFound(BidId),

    /// The bid price is above the active auction's price limit.
    #[error("DV_ERR_201: bid price {price} exceeds auction price limit {limit}")]
    PriceExceedsLimit { price: U256, limit: U256 },

    /// The bid failed validation.
    #[error("DV_ERR_202: invalid bid: {reason}")]
    InvalidBid { reason: String },

    // =================================================================
    // Order Errors (3xx)
    // =================================================================
    /// The requested order does not exist.
    #[error("DV_ERR_300: order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order failed validation.
    #[error("DV_ERR_301: invalid order: {reason}")]
    InvalidOrder { reason: String },

    // =================================================================
    // Registry / Directory Errors (4xx)
    // =================================================================
    /// The requested station does not exist.
    #[error("DV_ERR_400: station not found: {0}")]
    StationNotFound(StationId),

    /// The station failed validation.
    #[error("DV_ERR_401: invalid station: {reason}")]
    InvalidStation { reason: String },

    /// No token is registered under this symbol.
    #[error("DV_ERR_402: contract not found: {0}")]
    TokenNotFound(String),

    /// The token registry entry failed validation.
    #[error("DV_ERR_403: invalid contract: {reason}")]
    InvalidToken { reason: String },

    /// No user is registered under this address.
    #[error("DV_ERR_404: user not found: {0}")]
    UserNotFound(Address),

    /// The user entry failed validation.
    #[error("DV_ERR_405: invalid user: {reason}")]
    InvalidUser { reason: String },

    /// A record with the same key already exists.
    #[error("DV_ERR_406: duplicate record: {0}")]
    Duplicate(String),

    // =================================================================
    // Deposit / Wallet Errors (5xx)
    // =================================================================
    /// The deposit was made in a token other than the one the action needs.
    #[error("DV_ERR_500: invalid deposit token: expected {expected} ({symbol}), got {actual}")]
    InvalidDepositToken {
        symbol: String,
        expected: Address,
        actual: Address,
    },

    /// The action requires a deposit but the input carried none.
    #[error("DV_ERR_501: action requires a {symbol} deposit")]
    MissingDeposit { symbol: String },

    /// Not enough available balance for the requested movement.
    #[error(
        "DV_ERR_502: insufficient balance of {token} for {owner}: \
         need {needed}, have {available}"
    )]
    InsufficientBalance {
        token: Address,
        owner: Address,
        needed: U256,
        available: U256,
    },

    /// Not enough escrowed balance to release or settle.
    #[error("DV_ERR_503: insufficient frozen balance of {token} for {owner}")]
    InsufficientFrozen { token: Address, owner: Address },

    /// Nothing to withdraw.
    #[error("DV_ERR_504: no balance of {0} to withdraw")]
    NothingToWithdraw(String),

    /// Supply conservation invariant violated.
    #[error("DV_ERR_505: supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// The application address has not been relayed yet.
    #[error("DV_ERR_506: no application address defined yet, contact the DeVolt support")]
    ApplicationAddressUnknown,

    // =================================================================
    // Access Errors (6xx)
    // =================================================================
    /// The caller is unknown or lacks the required role.
    #[error("DV_ERR_600: unauthorized: {reason}")]
    Unauthorized { reason: String },

    // =================================================================
    // Codec Errors (7xx)
    // =================================================================
    /// A binary payload could not be decoded.
    #[error("DV_ERR_700: malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// The request names an action the router does not know.
    #[error("DV_ERR_701: unknown action: {0}")]
    UnknownAction(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Generic validation failure (non-positive amounts, zero addresses, ...).
    #[error("DV_ERR_900: invalid input: {0}")]
    InvalidInput(String),

    /// The input index was already processed (or arrived out of order).
    #[error("DV_ERR_901: input {index} already processed (last accepted: {last})")]
    InputAlreadyProcessed { index: u64, last: u64 },

    /// 256-bit arithmetic overflowed.
    #[error("DV_ERR_902: arithmetic overflow: {0}")]
    Overflow(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("DV_ERR_903: configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("DV_ERR_904: serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("DV_ERR_999: internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DevoltError>;

impl From<serde_json::Error> for DevoltError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl DevoltError {
    /// Shorthand for the directory miss raised by the access guard.
    #[must_use]
    pub fn unknown_caller(address: Address) -> Self {
        Self::Unauthorized {
            reason: format!("failed to find user by address {address}: record not found"),
        }
    }
}
