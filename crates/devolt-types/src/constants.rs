//! System-wide constants for the DeVolt settlement engine.

/// `transfer(address,uint256)` function selector.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Encoded transfer call: selector + padded address word + amount word.
pub const TRANSFER_PAYLOAD_LEN: usize = 4 + 32 + 32;

/// ABI word size.
pub const WORD_LEN: usize = 32;

/// Fixed header of an ERC-20 portal deposit: success flag, token, sender,
/// amount. Execution-layer data follows.
pub const ERC20_DEPOSIT_HEADER_LEN: usize = 1 + 20 + 20 + 32;

/// Registry symbol of the energy-credit token.
pub const DEFAULT_CREDIT_SYMBOL: &str = "VOLT";

/// Registry symbol of the settlement stablecoin.
pub const DEFAULT_STABLE_SYMBOL: &str = "STABLECOIN";

/// Share of each order paid to the station owner, in percent.
pub const DEFAULT_STATION_FEE_PERCENT: u8 = 40;

/// Denominator for percentage splits.
pub const PERCENT_BASE: u64 = 100;

/// Default ERC-20 portal (deposit notifications arrive from here).
pub const DEFAULT_ERC20_PORTAL: &str = "0x9C21AEb2093C32DDbC53eEF24B873BDCd1aDa1DB";

/// Default application-address relay.
pub const DEFAULT_ADDRESS_RELAY: &str = "0xF5DE34d6BbC0446E2a45719E718efEbaaE179daE";

/// Administrator seeded into the user directory at genesis.
pub const DEFAULT_INITIAL_ADMIN: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "DeVolt";
