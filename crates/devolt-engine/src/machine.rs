//! The marketplace state machine.
//!
//! [`Marketplace::advance`] consumes one input at a time:
//!
//! 1. Admit the input index (consumed even if the input is rejected)
//! 2. Stage a copy of the state
//! 3. Resolve the sender: address relay, ERC-20 portal, or a plain request
//! 4. Route the request and verify supply conservation on the staged ledger
//! 5. Commit the staged state on success, drop it on failure
//!
//! A rejected input leaves no trace besides its consumed index: no records,
//! no balances, no outputs.

use devolt_codec::{
    DecodedDeposit, compute_output_root, compute_state_root, decode_address_relay,
    decode_erc20_deposit,
};
use devolt_settlement::{InputSequencer, Wallet};
use devolt_types::{
    Address, Deposit, MarketplaceConfig, Outputs, Result, Role, Timestamp, User,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    repository::{MemoryStore, UserRepository},
    request::Action,
    router::{InputContext, Router},
};

/// One input of the ordered stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceInput {
    pub index: u64,
    pub msg_sender: Address,
    pub block_timestamp: Timestamp,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

impl AdvanceInput {
    #[must_use]
    pub fn new(
        index: u64,
        msg_sender: Address,
        block_timestamp: Timestamp,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            index,
            msg_sender,
            block_timestamp,
            payload: payload.into(),
        }
    }
}

/// Everything a replay must reproduce bit for bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    pub store: MemoryStore,
    pub wallet: Wallet,
    pub sequencer: InputSequencer,
    pub application_address: Option<Address>,
    /// Vouchers emitted so far; the next voucher's index.
    pub vouchers_emitted: u64,
}

#[derive(Debug)]
pub struct Marketplace {
    config: MarketplaceConfig,
    state: MarketState,
}

impl Marketplace {
    /// Build an empty marketplace with `config.initial_admin` as its only user.
    ///
    /// # Errors
    /// `Configuration` if the config is invalid.
    pub fn new(config: MarketplaceConfig) -> Result<Self> {
        config.validate()?;
        let mut store = MemoryStore::new();
        store.insert_user(User::new(config.initial_admin, Role::Admin))?;
        let state = MarketState {
            store,
            wallet: Wallet::new(),
            sequencer: InputSequencer::new(),
            application_address: config.application_address,
            vouchers_emitted: 0,
        };
        info!(
            admin = %config.initial_admin,
            portal = %config.erc20_portal,
            relay = %config.address_relay,
            "Marketplace initialized"
        );
        Ok(Self { config, state })
    }

    /// Process one input.
    ///
    /// # Errors
    /// `InputAlreadyProcessed` for a stale index, otherwise the error that
    /// rejected the input. State is unchanged apart from the index.
    pub fn advance(&mut self, input: &AdvanceInput) -> Result<Outputs> {
        self.state.sequencer.admit(input.index)?;

        let mut staged = self.state.clone();
        match self.process(&mut staged, input) {
            Ok(outputs) => {
                staged.vouchers_emitted += outputs.vouchers.len() as u64;
                self.state = staged;
                info!(
                    index = input.index,
                    sender = %input.msg_sender,
                    notices = outputs.notices.len(),
                    vouchers = outputs.vouchers.len(),
                    "Input accepted"
                );
                Ok(outputs)
            }
            Err(err) => {
                warn!(
                    index = input.index,
                    sender = %input.msg_sender,
                    error = %err,
                    "Input rejected"
                );
                Err(err)
            }
        }
    }

    fn process(&self, staged: &mut MarketState, input: &AdvanceInput) -> Result<Outputs> {
        let outputs = if input.msg_sender == self.config.address_relay {
            let application = decode_address_relay(&input.payload)?;
            staged.application_address = Some(application);
            info!(%application, "Application address relayed");
            Outputs::new()
        } else if input.msg_sender == self.config.erc20_portal {
            let DecodedDeposit {
                deposit,
                exec_layer_data,
            } = decode_erc20_deposit(&input.payload)?;
            staged.wallet.deposit(deposit.token, deposit.sender, deposit.amount)?;
            debug!(
                token = %deposit.token,
                sender = %deposit.sender,
                amount = %deposit.amount,
                "Deposit credited"
            );
            if exec_layer_data.is_empty() {
                Outputs::new()
            } else {
                let action = Action::parse(&exec_layer_data)?;
                let caller = deposit.sender;
                self.route(staged, caller, Deposit::Token(deposit), input.block_timestamp, action)?
            }
        } else {
            let action = Action::parse(&input.payload)?;
            self.route(staged, input.msg_sender, Deposit::None, input.block_timestamp, action)?
        };
        staged.wallet.verify_all()?;
        Ok(outputs)
    }

    fn route(
        &self,
        staged: &mut MarketState,
        caller: Address,
        deposit: Deposit,
        now: Timestamp,
        action: Action,
    ) -> Result<Outputs> {
        let ctx = InputContext {
            caller,
            deposit,
            now,
            next_voucher: staged.vouchers_emitted,
            application: staged.application_address,
        };
        Router::new(&mut staged.store, &mut staged.wallet, &self.config).dispatch(&ctx, action)
    }

    /// SHA-256 over the canonical serialization of the committed state.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        compute_state_root(&self.state)
    }

    /// SHA-256 over a batch of outputs.
    #[must_use]
    pub fn output_root(outputs: &Outputs) -> [u8; 32] {
        compute_output_root(outputs)
    }

    #[must_use]
    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.state.store
    }

    #[must_use]
    pub fn wallet(&self) -> &Wallet {
        &self.state.wallet
    }

    #[must_use]
    pub fn application_address(&self) -> Option<Address> {
        self.state.application_address
    }

    #[must_use]
    pub fn vouchers_emitted(&self) -> u64 {
        self.state.vouchers_emitted
    }

    /// Whether `address` is in the user directory.
    #[must_use]
    pub fn is_registered(&self, address: Address) -> bool {
        self.state.store.find_user(address).is_ok()
    }
}
