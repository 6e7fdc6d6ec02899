//! Action routing.
//!
//! The router authorizes the caller for a parsed [`Action`] and hands it to
//! the engine that owns it. Every caller must be in the user directory;
//! administrative actions additionally require the `admin` role.

use devolt_settlement::Wallet;
use devolt_types::{Address, Deposit, MarketplaceConfig, Outputs, Result, Role, Timestamp};
use tracing::debug;

use crate::{
    access::AccessGuard,
    auction::AuctionEngine,
    bid::BidEngine,
    directory::UserDirectory,
    order::OrderSettlement,
    registry::TokenRegistry,
    repository::Repositories,
    request::Action,
    settlement::SettlementEngine,
    station::{NewStation, StationEngine},
    withdrawal::WithdrawalEngine,
};

/// Per-input facts the engines need besides the request itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputContext {
    /// `msg_sender`, or the depositor for portal inputs.
    pub caller: Address,
    pub deposit: Deposit,
    /// Block timestamp of the input.
    pub now: Timestamp,
    /// Index the next emitted voucher will receive.
    pub next_voucher: u64,
    pub application: Option<Address>,
}

pub struct Router<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
}

impl<'a, R: Repositories> Router<'a, R> {
    pub fn new(repo: &'a mut R, wallet: &'a mut Wallet, config: &'a MarketplaceConfig) -> Self {
        Self { repo, wallet, config }
    }

    /// Authorize and run `action`.
    ///
    /// # Errors
    /// `Unauthorized` for unknown callers or missing roles, otherwise
    /// whatever the engine rejects.
    pub fn dispatch(&mut self, ctx: &InputContext, action: Action) -> Result<Outputs> {
        let name = action.name();
        let user = if action.admin_only() {
            AccessGuard::require_admin(&*self.repo, ctx.caller, name)?
        } else {
            AccessGuard::require(
                &*self.repo,
                ctx.caller,
                &[Role::Admin, Role::StationOwner, Role::User],
                name,
            )?
        };
        debug!(caller = %ctx.caller, role = %user.role, action = name, "Routing action");

        let (repo, wallet, config) = (&mut *self.repo, &mut *self.wallet, self.config);
        let now = ctx.now;
        let application = ctx.application;
        match action {
            Action::CreateAuction(req) => AuctionEngine::new(repo, wallet, config).create(
                req.credits,
                req.price_limit,
                req.expires_at,
                now,
            ),
            Action::UpdateAuction(req) => {
                AuctionEngine::new(repo, wallet, config).update(req.id, &req.update, now)
            }
            Action::DeleteAuction(id) => AuctionEngine::new(repo, wallet, config).delete(id),
            Action::FinishAuction(id) => {
                let (outputs, _) = SettlementEngine::new(repo, wallet, config).finish(id, now)?;
                Ok(outputs)
            }
            Action::CreateBid(req) => {
                BidEngine::new(repo, wallet, config).create(&ctx.deposit, req.price, now)
            }
            Action::UpdateBid(req) => {
                BidEngine::new(repo, wallet, config).update(req.id, &req.update, now)
            }
            Action::CreateOrder(req) => OrderSettlement::new(repo, wallet, config, application)
                .create(&req.station_id, &ctx.deposit, now),
            Action::UpdateOrder(req) => OrderSettlement::new(repo, wallet, config, application)
                .update(req.id, req.credits, now),
            Action::DeleteOrder(id) => {
                OrderSettlement::new(repo, wallet, config, application).delete(id)
            }
            Action::OffSetStationConsumption(req) => {
                StationEngine::new(repo, wallet, config, application)
                    .offset(&user, &req.id, req.credits, now)
            }
            Action::CreateStation(req) => StationEngine::new(repo, wallet, config, application)
                .create(
                    NewStation {
                        id: req.id,
                        owner: req.owner,
                        price_per_credit: req.price_per_credit,
                        latitude: req.latitude,
                        longitude: req.longitude,
                    },
                    now,
                ),
            Action::UpdateStation(req) => StationEngine::new(repo, wallet, config, application)
                .update(&req.id, &req.update, now),
            Action::DeleteStation(id) => {
                StationEngine::new(repo, wallet, config, application).delete(&id)
            }
            Action::CreateContract(req) => {
                TokenRegistry::create(repo, &req.symbol, req.address, now)
            }
            Action::UpdateContract(req) => {
                TokenRegistry::update(repo, &req.symbol, req.address, now)
            }
            Action::DeleteContract(symbol) => TokenRegistry::delete(repo, &symbol),
            Action::CreateUser(req) => UserDirectory::create(repo, req.address, req.role),
            Action::UpdateUser(req) => UserDirectory::update(repo, req.address, req.role),
            Action::DeleteUser(address) => UserDirectory::delete(repo, address),
            Action::WithdrawVolt => WithdrawalEngine::new(&*repo, wallet, config, ctx.next_voucher)
                .withdraw_credits(ctx.caller),
            Action::WithdrawStablecoin => {
                WithdrawalEngine::new(&*repo, wallet, config, ctx.next_voucher)
                    .withdraw_stablecoin(ctx.caller)
            }
            Action::WithdrawApp => WithdrawalEngine::new(&*repo, wallet, config, ctx.next_voucher)
                .withdraw_application(ctx.caller, application),
        }
    }
}
