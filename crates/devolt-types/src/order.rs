//! Station purchase orders.
//!
//! An order is created from a stablecoin deposit aimed at a station. The
//! deposit is split between the station owner and the application; the two
//! fees always sum to the deposited amount.

use serde::{Deserialize, Serialize};

use crate::{Address, OrderId, StationId, Timestamp, U256, amount};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Paid,
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub station_id: StationId,
    pub buyer: Address,
    #[serde(with = "amount::dec")]
    pub credits_paid: U256,
    #[serde(with = "amount::dec")]
    pub station_fee: U256,
    #[serde(with = "amount::dec")]
    pub application_fee: U256,
    pub state: OrderState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Sum of both fees. Equal to the deposit for every order created
    /// through the settlement path.
    #[must_use]
    pub fn total_fees(&self) -> U256 {
        self.station_fee.saturating_add(self.application_fee)
    }
}
