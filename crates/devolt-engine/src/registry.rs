//! Token ("contract") registry.
//!
//! Maps a symbol to the ledger address of its token contract and checks that
//! an input's deposit is in the token an action expects.

use devolt_types::{Address, Deposit, DevoltError, Outputs, Result, Timestamp, Token, TokenDeposit};
use tracing::info;

use crate::repository::TokenRepository;

pub struct TokenRegistry;

impl TokenRegistry {
    pub fn address_of<R: TokenRepository>(repo: &R, symbol: &str) -> Result<Address> {
        Ok(repo.find_token(symbol)?.address)
    }

    /// Accept `deposit` only if it is a positive deposit of `symbol`.
    ///
    /// # Errors
    /// - `MissingDeposit` if the input carried no deposit
    /// - `InvalidDepositToken` if the deposit is in another token
    /// - `InvalidInput` if the amount is zero
    pub fn require_deposit<R: TokenRepository>(
        repo: &R,
        symbol: &str,
        deposit: &Deposit,
    ) -> Result<TokenDeposit> {
        let Some(token_deposit) = deposit.as_token() else {
            return Err(DevoltError::MissingDeposit {
                symbol: symbol.to_string(),
            });
        };
        let expected = Self::address_of(repo, symbol)?;
        if token_deposit.token != expected {
            return Err(DevoltError::InvalidDepositToken {
                symbol: symbol.to_string(),
                expected,
                actual: token_deposit.token,
            });
        }
        if token_deposit.amount.is_zero() {
            return Err(DevoltError::InvalidInput(format!(
                "{symbol} deposit must be positive"
            )));
        }
        Ok(token_deposit.clone())
    }

    pub fn create<R: TokenRepository>(
        repo: &mut R,
        symbol: &str,
        address: Address,
        now: Timestamp,
    ) -> Result<Outputs> {
        let token = Token::new(symbol, address, now)?;
        repo.insert_token(token.clone())?;
        info!(symbol = %token.symbol, address = %token.address, "Contract registered");
        Ok(Outputs::notice(format!(
            "created contract with symbol: {} and address: {}",
            token.symbol, token.address
        )))
    }

    pub fn update<R: TokenRepository>(
        repo: &mut R,
        symbol: &str,
        address: Address,
        now: Timestamp,
    ) -> Result<Outputs> {
        let mut token = repo.find_token(symbol)?;
        token.address = address;
        token.updated_at = now;
        token.validate()?;
        repo.update_token(token.clone())?;
        info!(symbol = %token.symbol, address = %token.address, "Contract updated");
        Ok(Outputs::notice(format!(
            "updated contract with symbol: {} and address: {}",
            token.symbol, token.address
        )))
    }

    pub fn delete<R: TokenRepository>(repo: &mut R, symbol: &str) -> Result<Outputs> {
        let token = repo.delete_token(symbol)?;
        info!(symbol = %token.symbol, "Contract deleted");
        Ok(Outputs::notice(format!(
            "deleted contract with symbol: {}",
            token.symbol
        )))
    }
}
