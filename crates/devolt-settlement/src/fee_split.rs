//! Order fee splitting.
//!
//! ```text
//! station_fee     = amount * station_percent / 100
//! application_fee = amount - station_fee
//! ```
//!
//! The product is never formed directly, so the split is exact for every
//! `U256` amount.

use devolt_types::{FeeSplit, Result, U256, constants::PERCENT_BASE};

/// Fees owed for one order. Always sums to the deposited amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub station_fee: U256,
    pub application_fee: U256,
}

/// Split `amount` per `split`.
///
/// # Errors
/// `Configuration` if the split itself is out of range.
pub fn split_fee(amount: U256, split: FeeSplit) -> Result<FeeBreakdown> {
    split.validate()?;
    let base = U256::from(PERCENT_BASE);
    let pct = U256::from(split.station_percent);

    // (q*100 + r) * p / 100 == q*p + r*p/100 since r*p < 100*100.
    let station_fee = amount / base * pct + amount % base * pct / base;
    Ok(FeeBreakdown {
        station_fee,
        application_fee: amount - station_fee,
    })
}
