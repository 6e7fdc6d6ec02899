//! Supply conservation invariant checker.
//!
//! Enforced after every committed input:
//! ```text
//! ∀ token: Σ(available + frozen) == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! Withdrawals here are everything that left the ledger as a voucher. If the
//! invariant breaks, the input is rejected and nothing is committed.

use std::collections::BTreeMap;

use devolt_types::{Address, DevoltError, Result, U256, amount};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Totals {
    #[serde(with = "amount::dec")]
    deposited: U256,
    #[serde(with = "amount::dec")]
    withdrawn: U256,
}

/// Per-token supply totals since genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyConservation {
    totals: BTreeMap<Address, Totals>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deposit(&mut self, token: Address, value: U256) -> Result<()> {
        let t = self.totals.entry(token).or_default();
        t.deposited = amount::add(t.deposited, value)?;
        Ok(())
    }

    pub fn record_withdrawal(&mut self, token: Address, value: U256) -> Result<()> {
        let t = self.totals.entry(token).or_default();
        t.withdrawn = amount::add(t.withdrawn, value)?;
        Ok(())
    }

    /// Expected supply: deposits - withdrawals.
    pub fn expected_supply(&self, token: Address) -> Result<U256> {
        let t = self.totals.get(&token).copied().unwrap_or_default();
        t.deposited
            .checked_sub(t.withdrawn)
            .ok_or_else(|| DevoltError::SupplyInvariantViolation {
                reason: format!(
                    "token {token}: withdrawn {} exceeds deposited {}",
                    t.withdrawn, t.deposited
                ),
            })
    }

    /// Compare the ledger's actual supply of `token` against the totals.
    ///
    /// # Errors
    /// [`DevoltError::SupplyInvariantViolation`] if actual != expected.
    pub fn verify(&self, token: Address, actual_supply: U256) -> Result<()> {
        let expected = self.expected_supply(token)?;
        if actual_supply != expected {
            return Err(DevoltError::SupplyInvariantViolation {
                reason: format!(
                    "token {token}: actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.total_deposits(token),
                    self.total_withdrawals(token),
                ),
            });
        }
        Ok(())
    }

    /// Tokens with any recorded movement, in address order.
    pub fn tracked_tokens(&self) -> impl Iterator<Item = Address> + '_ {
        self.totals.keys().copied()
    }

    #[must_use]
    pub fn total_deposits(&self, token: Address) -> U256 {
        self.totals
            .get(&token)
            .map_or_else(U256::zero, |t| t.deposited)
    }

    #[must_use]
    pub fn total_withdrawals(&self, token: Address) -> U256 {
        self.totals
            .get(&token)
            .map_or_else(U256::zero, |t| t.withdrawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address::from_low_u8(1)
    }

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(token()).unwrap(), U256::zero());
        assert!(sc.verify(token(), U256::zero()).is_ok());
        assert_eq!(sc.tracked_tokens().count(), 0);
    }

    #[test]
    fn deposits_minus_withdrawals() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), U256::from(1000u64)).unwrap();
        sc.record_withdrawal(token(), U256::from(300u64)).unwrap();
        assert_eq!(sc.expected_supply(token()).unwrap(), U256::from(700u64));
        sc.verify(token(), U256::from(700u64)).unwrap();
    }

    #[test]
    fn mismatch_is_a_violation() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), U256::from(10u64)).unwrap();
        let err = sc.verify(token(), U256::from(11u64)).unwrap_err();
        assert!(matches!(err, DevoltError::SupplyInvariantViolation { .. }));
        assert!(format!("{err}").contains("DV_ERR_505"));
    }

    #[test]
    fn over_withdrawal_is_a_violation() {
        let mut sc = SupplyConservation::new();
        sc.record_withdrawal(token(), U256::one()).unwrap();
        assert!(sc.expected_supply(token()).is_err());
    }

    #[test]
    fn tokens_are_independent() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), U256::from(5u64)).unwrap();
        sc.record_deposit(Address::from_low_u8(2), U256::from(9u64)).unwrap();
        assert_eq!(sc.total_deposits(token()), U256::from(5u64));
        assert_eq!(sc.tracked_tokens().count(), 2);
    }
}
