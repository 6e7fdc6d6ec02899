//! # devolt-settlement
//!
//! **Settlement plane**: the pure calculations and ledger bookkeeping behind
//! every monetary effect of the marketplace.
//!
//! ## Architecture
//!
//! - [`allocate`] ranks an auction's pending bids and walks the supply,
//!   producing one [`Fill`] per bid. No side effects.
//! - [`split_fee`] divides an order's deposit between station owner and
//!   application without intermediate overflow.
//! - [`Wallet`] holds per-(token, owner) `available`/`frozen` balances and
//!   checks supply conservation against [`SupplyConservation`].
//! - [`InputSequencer`] admits each input index exactly once, in order.

pub mod allocation;
pub mod fee_split;
pub mod sequencer;
pub mod supply_conservation;
pub mod wallet;

pub use allocation::{Allocation, Fill, allocate};
pub use fee_split::{FeeBreakdown, split_fee};
pub use sequencer::InputSequencer;
pub use supply_conservation::SupplyConservation;
pub use wallet::Wallet;
