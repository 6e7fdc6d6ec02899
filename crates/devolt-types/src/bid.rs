//! Bid types.
//!
//! A bid is backed 1:1 by the credit-token deposit it arrived with. Bids are
//! mutated only at auction finish (state transition) or by an administrative
//! correction while still `pending`.

use serde::{Deserialize, Serialize};

use crate::{Address, AuctionId, BidId, Timestamp, U256, amount};

/// Lifecycle state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidState {
    Pending,
    Filled,
    PartiallyFilled,
    Refunded,
}

impl std::fmt::Display for BidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Filled => write!(f, "filled"),
            Self::PartiallyFilled => write!(f, "partially_filled"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub auction_id: AuctionId,
    pub bidder: Address,
    /// Credits offered; equals the deposited credit-token amount.
    #[serde(with = "amount::dec")]
    pub credits: U256,
    #[serde(with = "amount::dec")]
    pub price: U256,
    pub state: BidState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Bid {
    #[must_use]
    pub fn new(
        id: BidId,
        auction_id: AuctionId,
        bidder: Address,
        credits: U256,
        price: U256,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            auction_id,
            bidder,
            credits,
            price,
            state: BidState::Pending,
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == BidState::Pending
    }
}

/// Administrative correction of a pending bid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidUpdate {
    #[serde(default, with = "amount::dec_opt")]
    pub credits: Option<U256>,
    #[serde(default, with = "amount::dec_opt")]
    pub price: Option<U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bid_is_pending() {
        let bid = Bid::new(
            BidId(1),
            AuctionId(1),
            Address::from_low_u8(1),
            U256::from(10_000u64),
            U256::from(1000u64),
            42,
        );
        assert!(bid.is_pending());
        assert_eq!(bid.updated_at, 42);
    }

    #[test]
    fn state_display_and_serde() {
        assert_eq!(format!("{}", BidState::PartiallyFilled), "partially_filled");
        let json = serde_json::to_string(&BidState::PartiallyFilled).unwrap();
        assert_eq!(json, "\"partially_filled\"");
        let back: BidState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BidState::PartiallyFilled);
    }

    #[test]
    fn bid_serializes_amounts_as_strings() {
        let bid = Bid::new(
            BidId(3),
            AuctionId(1),
            Address::from_low_u8(9),
            U256::from(5u64),
            U256::from(7u64),
            1,
        );
        let json = serde_json::to_value(&bid).unwrap();
        assert_eq!(json["credits"], "5");
        assert_eq!(json["price"], "7");
        assert_eq!(json["state"], "pending");
    }
}
