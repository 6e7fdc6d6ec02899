//! Auction types.
//!
//! An auction offers a fixed supply of credits up to a price ceiling. At
//! most one auction is `ongoing` at any time; it leaves that state only
//! through the finish operation or an administrative cancel.

use serde::{Deserialize, Serialize};

use crate::{AuctionId, DevoltError, Result, Timestamp, U256, amount};

/// Lifecycle state of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionState {
    Ongoing,
    Finished,
    Cancelled,
}

impl std::fmt::Display for AuctionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Finished => write!(f, "finished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    /// Total credit supply the auction allocates.
    #[serde(with = "amount::dec")]
    pub credits: U256,
    /// Highest admissible bid price.
    #[serde(with = "amount::dec")]
    pub price_limit: U256,
    pub state: AuctionState,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Auction {
    /// Build a new `ongoing` auction and validate it.
    ///
    /// # Errors
    /// `InvalidAuction` if `credits` or `price_limit` is zero, or if
    /// `created_at >= expires_at`.
    pub fn new(
        id: AuctionId,
        credits: U256,
        price_limit: U256,
        expires_at: Timestamp,
        created_at: Timestamp,
    ) -> Result<Self> {
        let auction = Self {
            id,
            credits,
            price_limit,
            state: AuctionState::Ongoing,
            expires_at,
            created_at,
            updated_at: created_at,
        };
        auction.validate()?;
        Ok(auction)
    }

    /// Check the auction invariants.
    pub fn validate(&self) -> Result<()> {
        if self.credits.is_zero() {
            return Err(invalid("credits must be positive"));
        }
        if self.price_limit.is_zero() {
            return Err(invalid("price limit must be positive"));
        }
        if self.created_at >= self.expires_at {
            return Err(invalid(format!(
                "expiry {} must be after creation {}",
                self.expires_at, self.created_at
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.state == AuctionState::Ongoing
    }

    /// Expiry is inclusive: at `now == expires_at` the auction is over.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Apply a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, update: &AuctionUpdate, now: Timestamp) -> Result<()> {
        if let Some(credits) = update.credits {
            self.credits = credits;
        }
        if let Some(price_limit) = update.price_limit {
            self.price_limit = price_limit;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(expires_at) = update.expires_at {
            self.expires_at = expires_at;
        }
        self.updated_at = now;
        self.validate()
    }
}

fn invalid(reason: impl Into<String>) -> DevoltError {
    DevoltError::InvalidAuction {
        reason: reason.into(),
    }
}

/// Partial update of an auction.
///
/// Each field carries its own presence: `Some(0)` is a real value, not
/// "unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionUpdate {
    #[serde(default, with = "amount::dec_opt")]
    pub credits: Option<U256>,
    #[serde(default, with = "amount::dec_opt")]
    pub price_limit: Option<U256>,
    #[serde(default)]
    pub state: Option<AuctionState>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl AuctionUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credits.is_none()
            && self.price_limit.is_none()
            && self.state.is_none()
            && self.expires_at.is_none()
    }
}
