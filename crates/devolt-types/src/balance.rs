//! Balance tracking for the wallet ledger.
//!
//! Every (token, owner) pair has an `available` balance (withdrawable or
//! spendable by the next action) and a `frozen` balance (escrowed behind a
//! pending bid).

use serde::{Deserialize, Serialize};

use crate::{U256, amount};

/// A single balance entry for a (token, owner) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    #[serde(with = "amount::dec")]
    pub available: U256,
    #[serde(with = "amount::dec")]
    pub frozen: U256,
}

impl BalanceEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total balance (available + frozen). Saturates; the ledger never lets
    /// either half reach a value where this matters.
    #[must_use]
    pub fn total(&self) -> U256 {
        self.available.saturating_add(self.frozen)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.frozen.is_zero()
    }
}
