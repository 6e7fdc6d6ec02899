//! Auction finish.
//!
//! Finishing an expired auction:
//! 1. Rank its pending bids and allocate the supply ([`allocate`])
//! 2. Pay each allocated amount out of the bidder's escrow as a proceeds
//!    voucher in credit token
//! 3. Pay back every unallocated remainder the same way, as a refund voucher
//! 4. Mark bids and auction, emit refund vouchers, then proceeds vouchers,
//!    then the notice
//!
//! Everything paid out comes from escrow, so the vouchers of a finish always
//! sum to the deposits of the bids it settles.

use devolt_codec::transfer_voucher;
use devolt_settlement::{Allocation, Wallet, allocate};
use devolt_types::{
    AuctionId, AuctionState, DevoltError, MarketplaceConfig, Outputs, Result, Timestamp,
};
use tracing::{debug, info};

use crate::{registry::TokenRegistry, repository::Repositories};

pub struct SettlementEngine<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
}

impl<'a, R: Repositories> SettlementEngine<'a, R> {
    pub fn new(repo: &'a mut R, wallet: &'a mut Wallet, config: &'a MarketplaceConfig) -> Self {
        Self {
            repo,
            wallet,
            config,
        }
    }

    /// Settle auction `id` at `now`.
    ///
    /// # Errors
    /// - `AuctionNotFound` if absent, `NoActiveAuction` if not `ongoing`
    /// - `AuctionNotExpired` if `now < expires_at`
    pub fn finish(&mut self, id: AuctionId, now: Timestamp) -> Result<(Outputs, Allocation)> {
        let mut auction = self.repo.find_auction(id)?;
        if !auction.is_ongoing() {
            return Err(DevoltError::NoActiveAuction);
        }
        if !auction.is_expired_at(now) {
            return Err(DevoltError::AuctionNotExpired {
                id,
                expires_at: auction.expires_at,
                now,
            });
        }

        let bids = self.repo.bids_for_auction(id);
        let allocation = allocate(auction.credits, &bids, self.config.ranking);

        let mut refunds = Vec::new();
        let mut proceeds = Vec::new();
        if !allocation.fills.is_empty() {
            let credit_token =
                TokenRegistry::address_of(&*self.repo, &self.config.credit_symbol)?;
            for fill in &allocation.fills {
                if !fill.filled.is_zero() {
                    self.wallet.withdraw_frozen(credit_token, fill.bidder, fill.filled)?;
                    proceeds.push(transfer_voucher(credit_token, fill.bidder, fill.filled));
                    debug!(
                        bid_id = %fill.bid_id,
                        filled = %fill.filled,
                        price = %fill.price,
                        "Proceeds issued"
                    );
                }
                if !fill.refunded.is_zero() {
                    self.wallet.withdraw_frozen(credit_token, fill.bidder, fill.refunded)?;
                    refunds.push(transfer_voucher(credit_token, fill.bidder, fill.refunded));
                    debug!(bid_id = %fill.bid_id, refunded = %fill.refunded, "Refund issued");
                }

                let mut bid = self.repo.find_bid(fill.bid_id)?;
                bid.state = fill.state;
                bid.updated_at = now;
                self.repo.update_bid(bid)?;
            }
        }

        auction.state = AuctionState::Finished;
        auction.updated_at = now;
        self.repo.update_auction(auction)?;

        info!(
            auction_id = %id,
            bids = allocation.fills.len(),
            filled = %allocation.total_filled,
            refunded = %allocation.total_refunded,
            "Auction finished"
        );

        let mut outputs = Outputs::new();
        for voucher in refunds.into_iter().chain(proceeds) {
            outputs.push_voucher(voucher);
        }
        outputs.push_notice(format!("finished auction with id: {id} at: {now}"));
        Ok((outputs, allocation))
    }
}
