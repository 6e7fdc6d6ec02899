//! Charging stations: directory maintenance and consumption off-set.

use devolt_codec::transfer_voucher;
use devolt_settlement::Wallet;
use devolt_types::{
    Address, DevoltError, MarketplaceConfig, Outputs, Result, Role, Station, StationId,
    StationUpdate, Timestamp, U256, User,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::{registry::TokenRegistry, repository::Repositories};

/// Fields of a new station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStation {
    pub id: StationId,
    pub owner: Address,
    pub price_per_credit: U256,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

pub struct StationEngine<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
    application: Option<Address>,
}

impl<'a, R: Repositories> StationEngine<'a, R> {
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

    pub fn create(&mut self, new: NewStation, now: Timestamp) -> Result<Outputs> {
        let station = Station::new(
            new.id,
            new.owner,
            new.price_per_credit,
            new.latitude,
            new.longitude,
            now,
        )?;
        self.repo.insert_station(station.clone())?;
        info!(station_id = %station.id, owner = %station.owner, "Station created");
        Ok(Outputs::notice(format!(
            "created station with id: {}, address: {} and rate: {}",
            station.id, station.owner, station.price_per_credit
        )))
    }

    pub fn update(
        &mut self,
        id: &StationId,
        update: &StationUpdate,
        now: Timestamp,
    ) -> Result<Outputs> {
        let mut station = self.repo.find_station(id)?;
        station.apply(update, now)?;
        self.repo.update_station(station.clone())?;
        info!(station_id = %station.id, owner = %station.owner, "Station updated");
        Ok(Outputs::notice(format!(
            "updated station with id: {}, address: {} and rate: {}",
            station.id, station.owner, station.price_per_credit
        )))
    }

    pub fn delete(&mut self, id: &StationId) -> Result<Outputs> {
        self.repo.delete_station(id)?;
        info!(station_id = %id, "Station deleted");
        Ok(Outputs::notice(format!("deleted station with id: {id}")))
    }

    /// Off-set `credits` of a station's accrued consumption.
    ///
    /// The credits leave the application's pool and are paid to the platform
    /// address (the application itself when none is configured).
    ///
    /// # Errors
    /// - `Unauthorized` unless `caller` owns the station or is an admin
    /// - `InvalidInput` if `credits` is zero or above the accrued consumption
    /// - `ApplicationAddressUnknown`, or `InsufficientBalance` when the pool
    ///   is short
    pub fn offset(
        &mut self,
        caller: &User,
        id: &StationId,
        credits: U256,
        now: Timestamp,
    ) -> Result<Outputs> {
        let mut station = self.repo.find_station(id)?;
        if caller.role != Role::Admin && caller.address != station.owner {
            return Err(DevoltError::Unauthorized {
                reason: format!(
                    "user {} is neither the owner of station {id} nor an admin",
                    caller.address
                ),
            });
        }
        station.offset(credits, now)?;

        let application = self.application.ok_or(DevoltError::ApplicationAddressUnknown)?;
        let recipient = self.config.platform_address.unwrap_or(application);
        let token = TokenRegistry::address_of(&*self.repo, &self.config.credit_symbol)?;
        self.wallet.withdraw(token, application, credits)?;
        self.repo.update_station(station.clone())?;

        info!(
            station_id = %id,
            caller = %caller.address,
            %credits,
            remaining = %station.consumption,
            %recipient,
            "Station consumption off-set"
        );
        let mut outputs = Outputs::new();
        outputs.push_voucher(transfer_voucher(token, recipient, credits));
        outputs.push_notice(format!(
            "offSet Credits from station: {id} by msg_sender: {}",
            caller.address
        ));
        Ok(outputs)
    }
}
