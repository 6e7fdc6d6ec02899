//! Station purchase orders.
//!
//! A stablecoin deposit aimed at a station becomes a `paid` order. The
//! deposit is split per [`FeeSplit`](devolt_types::FeeSplit) and credited on
//! the ledger to the station owner and to the application. Nothing leaves
//! the ledger here; both parties withdraw separately.

use devolt_settlement::{Wallet, split_fee};
use devolt_types::{
    Address, Deposit, DevoltError, MarketplaceConfig, Order, OrderId, OrderState, Outputs, Result,
    StationId, StationState, Timestamp, U256,
};
use tracing::info;

use crate::{registry::TokenRegistry, repository::Repositories};

pub struct OrderSettlement<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
    application: Option<Address>,
}

impl<'a, R: Repositories> OrderSettlement<'a, R> {
    pub fn new(
        repo: &'a mut R,
        wallet: &'a mut Wallet,
        config: &'a MarketplaceConfig,
        application: Option<Address>,
    ) -> Self {
        Self {
            repo,
            wallet,
            config,
            application,
        }
    }

    /// Turn a stablecoin deposit into a paid order for `station_id`.
    ///
    /// # Errors
    /// - `MissingDeposit` / `InvalidDepositToken` unless the input carries a
    ///   stablecoin deposit
    /// - `InvalidOrder` for a zero deposit or an inactive station
    /// - `StationNotFound` if the station is absent
    /// - `ApplicationAddressUnknown` before the relay has run
    pub fn create(
        &mut self,
        station_id: &StationId,
        deposit: &Deposit,
        now: Timestamp,
    ) -> Result<Outputs> {
        let deposit = TokenRegistry::require_deposit(
            &*self.repo,
            &self.config.stable_symbol,
            deposit,
        )
        .map_err(|err| match err {
            DevoltError::InvalidInput(reason) => DevoltError::InvalidOrder { reason },
            other => other,
        })?;
        let station = self.repo.find_station(station_id)?;
        if station.state != StationState::Active {
            return Err(DevoltError::InvalidOrder {
                reason: format!("station {station_id} is not active"),
            });
        }
        let application = self.application.ok_or(DevoltError::ApplicationAddressUnknown)?;

        let fees = split_fee(deposit.amount, self.config.fee_split)?;
        self.wallet
            .transfer(deposit.token, deposit.sender, station.owner, fees.station_fee)?;
        self.wallet
            .transfer(deposit.token, deposit.sender, application, fees.application_fee)?;

        let id = self.repo.next_order_id();
        self.repo.insert_order(Order {
            id,
            station_id: station_id.clone(),
            buyer: deposit.sender,
            credits_paid: deposit.amount,
            station_fee: fees.station_fee,
            application_fee: fees.application_fee,
            state: OrderState::Paid,
            created_at: now,
            updated_at: now,
        })?;

        info!(
            order_id = %id,
            station_id = %station_id,
            buyer = %deposit.sender,
            station_fee = %fees.station_fee,
            application_fee = %fees.application_fee,
            "Order created"
        );
        Ok(Outputs::notice(format!(
            "created order {id} and paid {} as station fee and {} as application fee",
            fees.station_fee, fees.application_fee
        )))
    }

    /// Overwrite `credits_paid`. Fees are left as they were.
    pub fn update(&mut self, id: OrderId, credits: U256, now: Timestamp) -> Result<Outputs> {
        let mut order = self.repo.find_order(id)?;
        order.credits_paid = credits;
        order.updated_at = now;
        self.repo.update_order(order)?;

        info!(order_id = %id, %credits, "Order updated");
        Ok(Outputs::notice(format!(
            "updated order with id: {id} and credits: {credits}"
        )))
    }

    pub fn delete(&mut self, id: OrderId) -> Result<Outputs> {
        self.repo.delete_order(id)?;
        info!(order_id = %id, "Order deleted");
        Ok(Outputs::notice(format!("deleted order with id: {id}")))
    }
}
