//! # devolt-engine
//!
//! The **DeVolt** marketplace state machine.
//!
//! Inputs arrive as one ordered stream. Each one is decoded at the boundary
//! (portal deposit, address relay, or plain JSON request), routed to the
//! engine that owns the action, and committed only if it succeeds.
//!
//! - [`Marketplace`]: input sequencing, staging and commit, determinism roots
//! - [`Router`] / [`Action`]: request parsing and dispatch
//! - [`AccessGuard`]: caller resolution and role checks
//! - [`AuctionEngine`], [`BidEngine`], [`SettlementEngine`]: the credit auction
//! - [`OrderSettlement`]: stablecoin orders with the station/application fee split
//! - [`StationEngine`]: station directory and consumption off-set
//! - [`WithdrawalEngine`]: ledger pay-outs as transfer vouchers
//! - [`TokenRegistry`], [`UserDirectory`]: contract and user CRUD
//! - [`repository`]: storage traits and the in-memory [`MemoryStore`]
//!
//! ## Lifecycle of an auction
//!
//! ```text
//! createAuction ──▶ ongoing ──┬── createBid (credit deposit, escrowed) ...
//!                             ├── finishAuction (after expiry) ──▶ finished
//!                             └── updateAuction{state: cancelled} ──▶ cancelled
//! ```

pub mod access;
pub mod auction;
pub mod bid;
pub mod directory;
pub mod machine;
pub mod order;
pub mod registry;
pub mod repository;
pub mod request;
pub mod router;
pub mod settlement;
pub mod station;
pub mod withdrawal;

pub use access::AccessGuard;
pub use auction::AuctionEngine;
pub use bid::BidEngine;
pub use directory::UserDirectory;
pub use machine::{AdvanceInput, MarketState, Marketplace};
pub use order::OrderSettlement;
pub use registry::TokenRegistry;
pub use repository::{
    AuctionRepository, BidRepository, MemoryStore, OrderRepository, Repositories,
    StationRepository, TokenRepository, UserRepository,
};
pub use request::Action;
pub use router::{InputContext, Router};
pub use settlement::SettlementEngine;
pub use station::{NewStation, StationEngine};
pub use withdrawal::WithdrawalEngine;
