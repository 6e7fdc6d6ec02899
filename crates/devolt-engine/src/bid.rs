//! Bid admission.
//!
//! A bid arrives with a credit-token deposit. The deposit is escrowed in the
//! bidder's frozen balance until the auction is finished, cancelled or
//! deleted.

use devolt_settlement::Wallet;
use devolt_types::{
    Bid, BidId, BidUpdate, Deposit, DevoltError, MarketplaceConfig, Outputs, Result, Timestamp,
    U256,
};
use tracing::info;

use crate::{registry::TokenRegistry, repository::Repositories};

pub struct BidEngine<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
}

impl<'a, R: Repositories> BidEngine<'a, R> {
    pub fn new(repo: &'a mut R, wallet: &'a mut Wallet, config: &'a MarketplaceConfig) -> Self {
        Self {
            repo,
            wallet,
            config,
        }
    }

    /// Admit a bid against the active auction.
    ///
    /// # Errors
    /// - `MissingDeposit` / `InvalidDepositToken` unless the input carries a
    ///   credit-token deposit
    /// - `NoActiveAuction`, or `AuctionExpired` once `now >= expires_at`
    /// - `InvalidInput` for a zero price, `PriceExceedsLimit` above the cap
    pub fn create(&mut self, deposit: &Deposit, price: U256, now: Timestamp) -> Result<Outputs> {
        let deposit =
            TokenRegistry::require_deposit(&*self.repo, &self.config.credit_symbol, deposit)?;

        let auction = self.repo.active_auction()?;
        if auction.is_expired_at(now) {
            return Err(DevoltError::AuctionExpired {
                expires_at: auction.expires_at,
                now,
            });
        }
        check_price(price, auction.price_limit)?;

        self.wallet.freeze(deposit.token, deposit.sender, deposit.amount)?;

        let id = self.repo.next_bid_id();
        let bid = Bid::new(id, auction.id, deposit.sender, deposit.amount, price, now);
        self.repo.insert_bid(bid)?;

        info!(
            bid_id = %id,
            auction_id = %auction.id,
            bidder = %deposit.sender,
            credits = %deposit.amount,
            %price,
            "Bid created"
        );
        Ok(Outputs::notice(format!(
            "created bid with id: {id} and amount of credits: {} and price: {price}",
            deposit.amount
        )))
    }

    /// Administrative correction of a pending bid.
    ///
    /// Credits may only shrink; the difference is released from escrow.
    pub fn update(&mut self, id: BidId, update: &BidUpdate, now: Timestamp) -> Result<Outputs> {
        let mut bid = self.repo.find_bid(id)?;
        if !bid.is_pending() {
            return Err(invalid(format!("bid {id} is already {}", bid.state)));
        }
        let auction = self.repo.find_auction(bid.auction_id)?;
        if !auction.is_ongoing() {
            return Err(invalid(format!(
                "auction {} is {}, bids can no longer change",
                auction.id, auction.state
            )));
        }

        if let Some(price) = update.price {
            check_price(price, auction.price_limit)?;
            bid.price = price;
        }
        if let Some(credits) = update.credits {
            if credits.is_zero() {
                return Err(invalid("credits must be positive"));
            }
            if credits > bid.credits {
                return Err(invalid(format!(
                    "credits {credits} exceed the escrowed {}",
                    bid.credits
                )));
            }
            let token = TokenRegistry::address_of(&*self.repo, &self.config.credit_symbol)?;
            self.wallet.release(token, bid.bidder, bid.credits - credits)?;
            bid.credits = credits;
        }
        bid.updated_at = now;
        self.repo.update_bid(bid.clone())?;

        info!(bid_id = %id, credits = %bid.credits, price = %bid.price, "Bid updated");
        Ok(Outputs::notice(format!(
            "updated bid with id: {id} and amount of credits: {} and price: {}",
            bid.credits, bid.price
        )))
    }
}

fn check_price(price: U256, limit: U256) -> Result<()> {
    if price.is_zero() {
        return Err(DevoltError::InvalidInput(
            "bid price must be positive".to_string(),
        ));
    }
    if price > limit {
        return Err(DevoltError::PriceExceedsLimit { price, limit });
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> DevoltError {
    DevoltError::InvalidBid {
        reason: reason.into(),
    }
}
