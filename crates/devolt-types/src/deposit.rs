//! Inbound deposits.
//!
//! A deposit is resolved once, at the input boundary, into a tagged
//! variant. Engines declare which variant they accept instead of inspecting
//! the raw notification.

use serde::{Deserialize, Serialize};

use crate::{Address, U256, amount};

/// A token amount custodied on behalf of `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeposit {
    /// Ledger address of the deposited token contract.
    pub token: Address,
    /// Depositor; becomes the caller of the attached action.
    pub sender: Address,
    #[serde(with = "amount::dec")]
    pub amount: U256,
}

/// The deposit attached to an input, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Deposit {
    Token(TokenDeposit),
    #[default]
    None,
}

impl Deposit {
    #[must_use]
    pub fn as_token(&self) -> Option<&TokenDeposit> {
        match self {
            Self::Token(d) => Some(d),
            Self::None => None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_accessors() {
        let d = Deposit::Token(TokenDeposit {
            token: Address::from_low_u8(2),
            sender: Address::from_low_u8(3),
            amount: U256::from(10u64),
        });
        assert_eq!(d.as_token().unwrap().amount, U256::from(10u64));
        assert!(!d.is_none());
        assert!(Deposit::default().is_none());
        assert!(Deposit::None.as_token().is_none());
    }
}
