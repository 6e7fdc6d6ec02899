//! Escrow wallet ledger.
//!
//! Token custody after deposit:
//! 1. A portal deposit credits the sender's `available` balance
//! 2. A bid freezes its deposit (available → frozen)
//! 3. Finish settles the allocated part to the application and pays the
//!    rest out as a refund voucher
//! 4. Orders move fees between `available` balances
//! 5. Withdrawals pay `available` balances out as vouchers
//!
//! Every movement is checked; a failure leaves the ledger untouched. The
//! ledger keeps its own [`SupplyConservation`] totals.

use std::collections::BTreeMap;

use devolt_types::{Address, BalanceEntry, DevoltError, Result, U256, amount};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::supply_conservation::SupplyConservation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// token → owner → balance.
    balances: BTreeMap<Address, BTreeMap<Address, BalanceEntry>>,
    supply: SupplyConservation,
}

impl Wallet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a portal deposit to `owner`.
    pub fn deposit(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let entry = self.entry_mut(token, owner);
        entry.available = amount::add(entry.available, value)?;
        self.supply.record_deposit(token, value)?;
        debug!(%token, %owner, %value, "Deposit credited");
        Ok(())
    }

    /// Escrow funds (available → frozen).
    pub fn freeze(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let entry = self.entry_mut(token, owner);
        if entry.available < value {
            return Err(DevoltError::InsufficientBalance {
                token,
                owner,
                needed: value,
                available: entry.available,
            });
        }
        entry.available -= value;
        entry.frozen = amount::add(entry.frozen, value)?;
        Ok(())
    }

    /// Return escrowed funds to the owner (frozen → available).
    pub fn release(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let entry = self.entry_mut(token, owner);
        if entry.frozen < value {
            return Err(DevoltError::InsufficientFrozen { token, owner });
        }
        entry.frozen -= value;
        entry.available = amount::add(entry.available, value)?;
        Ok(())
    }

    /// Move available funds between two owners.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<()> {
        self.debit_available(token, from, value)?;
        let entry = self.entry_mut(token, to);
        entry.available = amount::add(entry.available, value)?;
        Ok(())
    }

    /// Pay `value` of the available balance out of the ledger.
    pub fn withdraw(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        self.debit_available(token, owner, value)?;
        self.supply.record_withdrawal(token, value)?;
        debug!(%token, %owner, %value, "Withdrawn");
        Ok(())
    }

    /// Pay `value` of the escrowed balance out of the ledger.
    pub fn withdraw_frozen(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        self.debit_frozen(token, owner, value)?;
        self.supply.record_withdrawal(token, value)?;
        debug!(%token, %owner, %value, "Escrow paid out");
        Ok(())
    }

    /// Pay the whole available balance out. Returns the amount, which may be
    /// zero.
    pub fn withdraw_all(&mut self, token: Address, owner: Address) -> Result<U256> {
        let value = self.balance(token, owner).available;
        if !value.is_zero() {
            self.withdraw(token, owner, value)?;
        }
        Ok(value)
    }

    #[must_use]
    pub fn balance(&self, token: Address, owner: Address) -> BalanceEntry {
        self.balances
            .get(&token)
            .and_then(|owners| owners.get(&owner))
            .copied()
            .unwrap_or_default()
    }

    /// Sum of every balance held in `token`.
    pub fn total_supply(&self, token: Address) -> Result<U256> {
        self.balances
            .get(&token)
            .into_iter()
            .flat_map(BTreeMap::values)
            .try_fold(U256::zero(), |acc, entry| {
                let acc = amount::add(acc, entry.available)?;
                amount::add(acc, entry.frozen)
            })
    }

    /// Verify supply conservation for `token`.
    pub fn verify_supply(&self, token: Address) -> Result<()> {
        self.supply.verify(token, self.total_supply(token)?)
    }

    /// Verify supply conservation for every token ever moved.
    pub fn verify_all(&self) -> Result<()> {
        self.supply
            .tracked_tokens()
            .try_for_each(|token| self.verify_supply(token))
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    fn entry_mut(&mut self, token: Address, owner: Address) -> &mut BalanceEntry {
        self.balances
            .entry(token)
            .or_default()
            .entry(owner)
            .or_default()
    }

    fn debit_available(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let entry = self.entry_mut(token, owner);
        if entry.available < value {
            return Err(DevoltError::InsufficientBalance {
                token,
                owner,
                needed: value,
                available: entry.available,
            });
        }
        entry.available -= value;
        Ok(())
    }

    fn debit_frozen(&mut self, token: Address, owner: Address, value: U256) -> Result<()> {
        let entry = self.entry_mut(token, owner);
        if entry.frozen < value {
            return Err(DevoltError::InsufficientFrozen { token, owner });
        }
        entry.frozen -= value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volt() -> Address {
        Address::from_low_u8(0xee)
    }

    fn alice() -> Address {
        Address::from_low_u8(1)
    }

    fn bob() -> Address {
        Address::from_low_u8(2)
    }

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    #[test]
    fn deposit_and_freeze() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(100)).unwrap();
        w.freeze(volt(), alice(), u(60)).unwrap();

        let bal = w.balance(volt(), alice());
        assert_eq!(bal.available, u(40));
        assert_eq!(bal.frozen, u(60));
        w.verify_all().unwrap();
    }

    #[test]
    fn freeze_insufficient_balance() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(10)).unwrap();
        let err = w.freeze(volt(), alice(), u(11)).unwrap_err();
        assert!(matches!(err, DevoltError::InsufficientBalance { .. }));
        assert_eq!(w.balance(volt(), alice()).available, u(10));
    }

    #[test]
    fn withdraw_frozen_pays_escrow_out() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(100)).unwrap();
        w.freeze(volt(), alice(), u(100)).unwrap();
        w.withdraw_frozen(volt(), alice(), u(70)).unwrap();
        w.withdraw_frozen(volt(), alice(), u(30)).unwrap();

        assert!(w.balance(volt(), alice()).is_zero());
        assert_eq!(w.supply().total_withdrawals(volt()), u(100));
        w.verify_supply(volt()).unwrap();
    }

    #[test]
    fn withdraw_more_than_frozen_fails() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(100)).unwrap();
        w.freeze(volt(), alice(), u(10)).unwrap();
        let err = w.withdraw_frozen(volt(), alice(), u(11)).unwrap_err();
        assert!(matches!(err, DevoltError::InsufficientFrozen { .. }));
        assert_eq!(w.balance(volt(), alice()).frozen, u(10));
    }

    #[test]
    fn release_returns_escrow() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(50)).unwrap();
        w.freeze(volt(), alice(), u(50)).unwrap();
        w.release(volt(), alice(), u(20)).unwrap();
        let bal = w.balance(volt(), alice());
        assert_eq!(bal.available, u(20));
        assert_eq!(bal.frozen, u(30));
    }

    #[test]
    fn transfer_and_withdraw_all() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(100)).unwrap();
        w.transfer(volt(), alice(), bob(), u(40)).unwrap();
        assert_eq!(w.withdraw_all(volt(), bob()).unwrap(), u(40));
        assert_eq!(w.withdraw_all(volt(), bob()).unwrap(), U256::zero());
        assert_eq!(w.total_supply(volt()).unwrap(), u(60));
        w.verify_all().unwrap();
    }

    #[test]
    fn transfer_to_self_is_neutral() {
        let mut w = Wallet::new();
        w.deposit(volt(), alice(), u(5)).unwrap();
        w.transfer(volt(), alice(), alice(), u(5)).unwrap();
        assert_eq!(w.balance(volt(), alice()).available, u(5));
    }

    #[test]
    fn serializes_deterministically() {
        let mut a = Wallet::new();
        a.deposit(volt(), bob(), u(1)).unwrap();
        a.deposit(volt(), alice(), u(2)).unwrap();
        let mut b = Wallet::new();
        b.deposit(volt(), alice(), u(2)).unwrap();
        b.deposit(volt(), bob(), u(1)).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
