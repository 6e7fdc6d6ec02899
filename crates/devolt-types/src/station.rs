//! Charging stations.
//!
//! Stations are directory records managed by administrators. The settlement
//! core touches them only to resolve an order's fee recipient and to debit
//! accrued consumption when credits are off-set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, DevoltError, Result, StationId, Timestamp, U256, amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationState {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub owner: Address,
    /// Accrued consumption, in credits, still waiting to be off-set.
    #[serde(with = "amount::dec")]
    pub consumption: U256,
    #[serde(with = "amount::dec")]
    pub price_per_credit: U256,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub state: StationState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Station {
    /// Build an `active` station with no accrued consumption.
    pub fn new(
        id: StationId,
        owner: Address,
        price_per_credit: U256,
        latitude: Decimal,
        longitude: Decimal,
        created_at: Timestamp,
    ) -> Result<Self> {
        let station = Self {
            id,
            owner,
            consumption: U256::zero(),
            price_per_credit,
            latitude,
            longitude,
            state: StationState::Active,
            created_at,
            updated_at: created_at,
        };
        station.validate()?;
        Ok(station)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.owner.is_zero() {
            return Err(invalid("owner must not be the zero address"));
        }
        if self.latitude.abs() > Decimal::from(90) {
            return Err(invalid(format!("latitude {} out of range", self.latitude)));
        }
        if self.longitude.abs() > Decimal::from(180) {
            return Err(invalid(format!("longitude {} out of range", self.longitude)));
        }
        Ok(())
    }

    /// Debit `credits` from the accrued consumption.
    ///
    /// # Errors
    /// `InvalidInput` if `credits` is zero or exceeds the accrued amount.
    pub fn offset(&mut self, credits: U256, now: Timestamp) -> Result<()> {
        if credits.is_zero() {
            return Err(DevoltError::InvalidInput(
                "credits to be off-set must be positive".to_string(),
            ));
        }
        self.consumption = self.consumption.checked_sub(credits).ok_or_else(|| {
            DevoltError::InvalidInput(format!(
                "cannot off-set {credits} credits from station {}: only {} accrued",
                self.id, self.consumption
            ))
        })?;
        self.updated_at = now;
        Ok(())
    }
}

/// Partial update of a station. The ID is immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationUpdate {
    #[serde(default)]
    pub owner: Option<Address>,
    #[serde(default, with = "amount::dec_opt")]
    pub consumption: Option<U256>,
    #[serde(default, with = "amount::dec_opt")]
    pub price_per_credit: Option<U256>,
    #[serde(default)]
    pub latitude: Option<Decimal>,
    #[serde(default)]
    pub longitude: Option<Decimal>,
    #[serde(default)]
    pub state: Option<StationState>,
}

impl Station {
    /// Apply a partial update, then revalidate.
    pub fn apply(&mut self, update: &StationUpdate, now: Timestamp) -> Result<()> {
        if let Some(owner) = update.owner {
            self.owner = owner;
        }
        if let Some(consumption) = update.consumption {
            self.consumption = consumption;
        }
        if let Some(price) = update.price_per_credit {
            self.price_per_credit = price;
        }
        if let Some(latitude) = update.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = update.longitude {
            self.longitude = longitude;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        self.updated_at = now;
        self.validate()
    }
}

fn invalid(reason: impl Into<String>) -> DevoltError {
    DevoltError::InvalidStation {
        reason: reason.into(),
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Station {
    pub fn dummy(id: &str, owner: Address, consumption: u64) -> Self {
        Self {
            id: StationId::new(id),
            owner,
            consumption: U256::from(consumption),
            price_per_credit: U256::from(50u64),
            latitude: Decimal::new(407_128, 4),
            longitude: Decimal::new(-740_060, 4),
            state: StationState::Active,
            created_at: 1,
            updated_at: 1,
        }
    }
}
