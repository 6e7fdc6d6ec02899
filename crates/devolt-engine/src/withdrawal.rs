//! Withdrawals.
//!
//! A withdrawal pays an owner's whole available balance of one token out of
//! the ledger as a transfer voucher. Voucher indices are global and assigned
//! in emission order.

use devolt_codec::transfer_voucher;
use devolt_settlement::Wallet;
use devolt_types::{Address, DevoltError, MarketplaceConfig, Outputs, Result, U256};
use tracing::info;

use crate::{registry::TokenRegistry, repository::Repositories};

pub struct WithdrawalEngine<'a, R> {
    repo: &'a R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
    /// Index the next emitted voucher will receive.
    next_voucher: u64,
}

impl<'a, R: Repositories> WithdrawalEngine<'a, R> {
    pub fn new(
        repo: &'a R,
        wallet: &'a mut Wallet,
        config: &'a MarketplaceConfig,
        next_voucher: u64,
    ) -> Self {
        Self {
            repo,
            wallet,
            config,
            next_voucher,
        }
    }

    /// Pay `caller`'s credit-token balance out.
    pub fn withdraw_credits(&mut self, caller: Address) -> Result<Outputs> {
        let config = self.config;
        self.withdraw_own(&config.credit_symbol, caller)
    }

    /// Pay `caller`'s stablecoin balance out.
    pub fn withdraw_stablecoin(&mut self, caller: Address) -> Result<Outputs> {
        let config = self.config;
        self.withdraw_own(&config.stable_symbol, caller)
    }

    /// Pay the application's balances of both tokens out to the application
    /// address. Both balances must be positive.
    pub fn withdraw_application(
        &mut self,
        caller: Address,
        application: Option<Address>,
    ) -> Result<Outputs> {
        let application = application.ok_or(DevoltError::ApplicationAddressUnknown)?;
        let config = self.config;
        let credit_symbol = &config.credit_symbol;
        let stable_symbol = &config.stable_symbol;
        let credit = TokenRegistry::address_of(self.repo, credit_symbol)?;
        let stable = TokenRegistry::address_of(self.repo, stable_symbol)?;

        let credit_balance = self.wallet.balance(credit, application).available;
        if credit_balance.is_zero() {
            return Err(DevoltError::NothingToWithdraw(credit_symbol.clone()));
        }
        let stable_balance = self.wallet.balance(stable, application).available;
        if stable_balance.is_zero() {
            return Err(DevoltError::NothingToWithdraw(stable_symbol.clone()));
        }

        let mut outputs = Outputs::new();
        let credit_index = self.pay(&mut outputs, credit, application, credit_balance)?;
        let stable_index = self.pay(&mut outputs, stable, application, stable_balance)?;

        info!(
            %application,
            %caller,
            credits = %credit_balance,
            stablecoin = %stable_balance,
            "Application balances withdrawn"
        );
        outputs.push_notice(format!(
            "withdrawn {credit_symbol} {credit_balance} and {stable_symbol} {stable_balance} \
             from {caller} with voucher index of ${credit_symbol}: {credit_index} \
             and ${stable_symbol}: {stable_index}"
        ));
        Ok(outputs)
    }

    fn withdraw_own(&mut self, symbol: &str, caller: Address) -> Result<Outputs> {
        let token = TokenRegistry::address_of(self.repo, symbol)?;
        let balance = self.wallet.balance(token, caller).available;
        if balance.is_zero() {
            return Err(DevoltError::NothingToWithdraw(symbol.to_string()));
        }

        let mut outputs = Outputs::new();
        let index = self.pay(&mut outputs, token, caller, balance)?;

        info!(%caller, symbol, %balance, voucher_index = index, "Balance withdrawn");
        outputs.push_notice(format!(
            "withdrawn {symbol} and {balance} from {caller} with voucher index: {index}"
        ));
        Ok(outputs)
    }

    /// Debit `owner` and emit the voucher. Returns its index.
    fn pay(
        &mut self,
        outputs: &mut Outputs,
        token: Address,
        owner: Address,
        value: U256,
    ) -> Result<u64> {
        self.wallet.withdraw(token, owner, value)?;
        outputs.push_voucher(transfer_voucher(token, owner, value));
        let index = self.next_voucher;
        self.next_voucher += 1;
        Ok(index)
    }
}
