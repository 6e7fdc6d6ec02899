//! # devolt-codec
//!
//! **Wire formats for the DeVolt engine.**
//!
//! Everything that crosses the boundary to the external settlement layer is
//! encoded here, byte for byte:
//!
//! - **Vouchers**: ERC-20 `transfer(address,uint256)` calls
//! - **Portal inputs**: ERC-20 deposit notifications and address relays
//! - **Determinism roots**: SHA-256 commitments over state and outputs
//!
//! The codec never decides whether a token is acceptable; callers compare
//! the decoded token address against the registry.

pub mod determinism;
pub mod portal;
pub mod voucher;

pub use determinism::{compute_output_root, compute_state_root, verify_output_root};
pub use portal::{DecodedDeposit, decode_address_relay, decode_erc20_deposit, encode_erc20_deposit};
pub use voucher::{Transfer, decode_transfer, encode_transfer, transfer_voucher};
