//! # devolt-types
//!
//! Shared types, errors, and configuration for the **DeVolt** marketplace
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`BidId`], [`OrderId`], [`StationId`], [`Address`]
//! - **Amounts**: [`U256`] and the decimal-string serde helpers in [`amount`]
//! - **Auction model**: [`Auction`], [`AuctionState`], [`AuctionUpdate`]
//! - **Bid model**: [`Bid`], [`BidState`], [`BidUpdate`]
//! - **Order model**: [`Order`], [`OrderState`]
//! - **Directory / registry**: [`Station`], [`Token`], [`User`], [`Role`]
//! - **Ledger**: [`BalanceEntry`]
//! - **Inputs**: [`Deposit`], [`TokenDeposit`]
//! - **Outputs**: [`Voucher`], [`Notice`], [`Outputs`]
//! - **Configuration**: [`MarketplaceConfig`], [`FeeSplit`], [`RankingPolicy`]
//! - **Errors**: [`DevoltError`] with `DV_ERR_` prefix codes
//! - **Constants**: selectors, symbols and defaults

pub mod amount;
pub mod auction;
pub mod balance;
pub mod bid;
pub mod config;
pub mod constants;
pub mod deposit;
pub mod error;
pub mod ids;
pub mod order;
pub mod output;
pub mod station;
pub mod token;
pub mod user;

// Re-export all primary types at crate root for ergonomic imports:
//   use devolt_types::{Auction, Bid, Order, Voucher, ...};

pub use amount::U256;
pub use auction::*;
pub use balance::*;
pub use bid::*;
pub use config::*;
pub use deposit::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use output::*;
pub use station::*;
pub use token::*;
pub use user::*;

// Constants are accessed via `devolt_types::constants::FOO`
// (not re-exported to avoid name collisions).
