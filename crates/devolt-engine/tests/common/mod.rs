//! Shared harness for the scenario tests.
//!
//! Builds a marketplace with both tokens registered, the application
//! address relayed, and a handful of users, then feeds it inputs with
//! strictly increasing indices.

#![allow(dead_code)]

use devolt_codec::encode_erc20_deposit;
use devolt_engine::{AdvanceInput, Marketplace};
use devolt_types::{Address, MarketplaceConfig, Outputs, Result, TokenDeposit, U256};
use serde_json::{Value, json};

pub const START: u64 = 1_700_000_000;

pub fn u(n: u64) -> U256 {
    U256::from(n)
}

pub fn volt() -> Address {
    Address([0xee; 20])
}

pub fn stablecoin() -> Address {
    Address([0xcc; 20])
}

pub fn app() -> Address {
    Address([0xaa; 20])
}

pub fn station_owner() -> Address {
    Address::from_low_u8(0x50)
}

/// A registered user with the plain `user` role.
pub fn user(n: u8) -> Address {
    Address::from_low_u8(0x10 + n)
}

pub fn request(path: &str, payload: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({ "path": path, "payload": payload })).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct Harness {
    pub market: Marketplace,
    pub now: u64,
    next_index: u64,
}

impl Harness {
    /// Genesis plus registry and directory setup. Uses default config.
    pub fn new() -> Self {
        Self::with_config(MarketplaceConfig::default())
    }

    pub fn with_config(config: MarketplaceConfig) -> Self {
        let mut h = Self::unrelayed(config);
        let relay = h.market.config().address_relay;
        h.raw(relay, app().0.to_vec()).unwrap();
        h
    }

    /// Setup without the application address relay.
    pub fn unrelayed(config: MarketplaceConfig) -> Self {
        init_tracing();
        let mut h = Self {
            market: Marketplace::new(config).unwrap(),
            now: START,
            next_index: 0,
        };
        h.admin("createContract", json!({"symbol": "VOLT", "address": volt().to_string()}))
            .unwrap();
        h.admin(
            "createContract",
            json!({"symbol": "STABLECOIN", "address": stablecoin().to_string()}),
        )
        .unwrap();
        h.admin(
            "createUser",
            json!({"address": station_owner().to_string(), "role": "station_owner"}),
        )
        .unwrap();
        for n in 1..=6 {
            h.admin("createUser", json!({"address": user(n).to_string(), "role": "user"}))
                .unwrap();
        }
        h
    }

    pub fn admin_address(&self) -> Address {
        self.market.config().initial_admin
    }

    /// Feed a raw input at the current time.
    pub fn raw(&mut self, sender: Address, payload: Vec<u8>) -> Result<Outputs> {
        let input = AdvanceInput::new(self.next_index, sender, self.now, payload);
        self.next_index += 1;
        self.market.advance(&input)
    }

    pub fn send(&mut self, sender: Address, path: &str, payload: Value) -> Result<Outputs> {
        self.raw(sender, request(path, payload))
    }

    pub fn admin(&mut self, path: &str, payload: Value) -> Result<Outputs> {
        let admin = self.admin_address();
        self.send(admin, path, payload)
    }

    /// Deposit through the portal, optionally carrying a request.
    pub fn deposit(
        &mut self,
        token: Address,
        sender: Address,
        amount: U256,
        action: Option<(&str, Value)>,
    ) -> Result<Outputs> {
        let exec = action.map(|(path, payload)| request(path, payload)).unwrap_or_default();
        let deposit = TokenDeposit {
            token,
            sender,
            amount,
        };
        let portal = self.market.config().erc20_portal;
        self.raw(portal, encode_erc20_deposit(&deposit, &exec))
    }

    pub fn bid(&mut self, bidder: Address, credits: u64, price: u64) -> Result<Outputs> {
        self.deposit(
            volt(),
            bidder,
            u(credits),
            Some(("createBid", json!({"price": price.to_string()}))),
        )
    }

    pub fn create_auction(&mut self, credits: u64, price_limit: u64, ttl: u64) -> Result<Outputs> {
        let expires_at = self.now + ttl;
        self.admin(
            "createAuction",
            json!({
                "credits": credits.to_string(),
                "price_limit": price_limit.to_string(),
                "expires_at": expires_at
            }),
        )
    }

    pub fn create_station(&mut self, id: &str) -> Result<Outputs> {
        self.admin(
            "createStation",
            json!({
                "id": id,
                "owner": station_owner().to_string(),
                "price_per_credit": "50",
                "latitude": "-23.5505",
                "longitude": "-46.6333"
            }),
        )
    }

    pub fn order(&mut self, buyer: Address, station: &str, amount: u64) -> Result<Outputs> {
        self.deposit(
            stablecoin(),
            buyer,
            u(amount),
            Some(("createOrder", json!({"station_id": station}))),
        )
    }

    pub fn available(&self, token: Address, owner: Address) -> U256 {
        self.market.wallet().balance(token, owner).available
    }

    pub fn frozen(&self, token: Address, owner: Address) -> U256 {
        self.market.wallet().balance(token, owner).frozen
    }
}
