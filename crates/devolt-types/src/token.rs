//! Token ("contract") registry entries.
//!
//! The registry maps a symbol such as `VOLT` or `STABLECOIN` to the ledger
//! address of the token contract. Engines only read it.

use serde::{Deserialize, Serialize};

use crate::{Address, DevoltError, Result, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub address: Address,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Token {
    pub fn new(symbol: impl Into<String>, address: Address, created_at: Timestamp) -> Result<Self> {
        let token = Self {
            symbol: symbol.into(),
            address,
            created_at,
            updated_at: created_at,
        };
        token.validate()?;
        Ok(token)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(DevoltError::InvalidToken {
                reason: "symbol must not be empty".to_string(),
            });
        }
        if self.address.is_zero() {
            return Err(DevoltError::InvalidToken {
                reason: "address must not be the zero address".to_string(),
            });
        }
        Ok(())
    }
}
