//! Auction lifecycle.
//!
//! At most one auction is `ongoing`. Expiry is lazy: an expired auction
//! stays active until it is finished. Leaving `ongoing` any other way than
//! through the finish operation (cancel, delete) hands the escrow of every
//! pending bid back to its bidder's available balance.

use devolt_settlement::Wallet;
use devolt_types::{
    Auction, AuctionId, AuctionState, AuctionUpdate, Bid, BidState, DevoltError, MarketplaceConfig,
    Outputs, Result, Timestamp, U256,
};
use tracing::info;

use crate::{registry::TokenRegistry, repository::Repositories};

pub struct AuctionEngine<'a, R> {
    repo: &'a mut R,
    wallet: &'a mut Wallet,
    config: &'a MarketplaceConfig,
}

impl<'a, R: Repositories> AuctionEngine<'a, R> {
    pub fn new(repo: &'a mut R, wallet: &'a mut Wallet, config: &'a MarketplaceConfig) -> Self {
        Self {
            repo,
            wallet,
            config,
        }
    }

    /// Open a new auction.
    ///
    /// # Errors
    /// - `AuctionAlreadyActive` if another auction is `ongoing`
    /// - `InvalidAuction` if the amounts are zero or `now >= expires_at`
    pub fn create(
        &mut self,
        credits: U256,
        price_limit: U256,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Result<Outputs> {
        if let Ok(active) = self.repo.active_auction() {
            return Err(DevoltError::AuctionAlreadyActive(active.id));
        }
        let id = self.repo.next_auction_id();
        let auction = Auction::new(id, credits, price_limit, expires_at, now)?;
        self.repo.insert_auction(auction)?;

        info!(auction_id = %id, %credits, %price_limit, expires_at, "Auction created");
        Ok(Outputs::notice(format!("created auction with id: {id}")))
    }

    /// Apply an administrative update.
    ///
    /// Finished auctions are immutable, and `finished` can only be reached
    /// through the finish operation.
    pub fn update(
        &mut self,
        id: AuctionId,
        update: &AuctionUpdate,
        now: Timestamp,
    ) -> Result<Outputs> {
        let mut auction = self.repo.find_auction(id)?;
        if auction.state == AuctionState::Finished {
            return Err(DevoltError::InvalidAuction {
                reason: format!("auction {id} is already finished"),
            });
        }
        if update.state == Some(AuctionState::Finished) {
            return Err(DevoltError::InvalidAuction {
                reason: "auctions are finished through finishAuction".to_string(),
            });
        }

        let was_ongoing = auction.is_ongoing();
        auction.apply(update, now)?;
        self.repo.update_auction(auction.clone())?;

        if was_ongoing && auction.state == AuctionState::Cancelled {
            let bids = self.repo.bids_for_auction(id);
            let released = self.release_escrow(&bids)?;
            for mut bid in bids.into_iter().filter(Bid::is_pending) {
                bid.state = BidState::Refunded;
                bid.updated_at = now;
                self.repo.update_bid(bid)?;
            }
            info!(auction_id = %id, %released, "Auction cancelled, escrow released");
        }

        info!(auction_id = %id, state = %auction.state, "Auction updated");
        Ok(Outputs::notice(format!("updated auction with id: {id}")))
    }

    /// Delete an auction together with its bids.
    pub fn delete(&mut self, id: AuctionId) -> Result<Outputs> {
        let auction = self.repo.delete_auction(id)?;
        let bids = self.repo.delete_bids_for_auction(id);
        let released = self.release_escrow(&bids)?;

        info!(
            auction_id = %id,
            state = %auction.state,
            bids = bids.len(),
            %released,
            "Auction deleted"
        );
        Ok(Outputs::notice(format!("deleted auction with id: {id}")))
    }

    /// Return the escrow of every pending bid in `bids`.
    fn release_escrow(&mut self, bids: &[Bid]) -> Result<U256> {
        let pending: Vec<&Bid> = bids.iter().filter(|b| b.is_pending()).collect();
        if pending.is_empty() {
            return Ok(U256::zero());
        }
        let token = TokenRegistry::address_of(&*self.repo, &self.config.credit_symbol)?;
        let mut released = U256::zero();
        for bid in pending {
            self.wallet.release(token, bid.bidder, bid.credits)?;
            released = devolt_types::amount::add(released, bid.credits)?;
        }
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use devolt_types::{Address, BidId, Token};

    use super::*;
    use crate::repository::{AuctionRepository, BidRepository, MemoryStore, TokenRepository};

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    fn volt() -> Address {
        Address::from_low_u8(0xee)
    }

    struct Fixture {
        store: MemoryStore,
        wallet: Wallet,
        config: MarketplaceConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let mut store = MemoryStore::new();
            store.insert_token(Token::new("VOLT", volt(), 0).unwrap()).unwrap();
            Self {
                store,
                wallet: Wallet::new(),
                config: MarketplaceConfig::default(),
            }
        }

        fn engine(&mut self) -> AuctionEngine<'_, MemoryStore> {
            AuctionEngine::new(&mut self.store, &mut self.wallet, &self.config)
        }

        /// Escrow a pending bid directly.
        fn escrowed_bid(&mut self, auction_id: AuctionId, bidder: u8, credits: u64) {
            let bidder = Address::from_low_u8(bidder);
            self.wallet.deposit(volt(), bidder, u(credits)).unwrap();
            self.wallet.freeze(volt(), bidder, u(credits)).unwrap();
            let id = self.store.next_bid_id();
            self.store
                .insert_bid(Bid::new(id, auction_id, bidder, u(credits), u(1), 1))
                .unwrap();
        }
    }

    #[test]
    fn create_emits_notice() {
        let mut fx = Fixture::new();
        let out = fx.engine().create(u(100_000), u(1000), 200, 100).unwrap();
        assert_eq!(out.notices[0].as_str(), "created auction with id: 1");
        assert!(out.vouchers.is_empty());
        assert!(fx.store.active_auction().unwrap().is_ongoing());
    }

    #[test]
    fn create_validates() {
        let mut fx = Fixture::new();
        assert!(matches!(
            fx.engine().create(U256::zero(), u(1), 200, 100).unwrap_err(),
            DevoltError::InvalidAuction { .. }
        ));
        assert!(matches!(
            fx.engine().create(u(1), u(1), 100, 100).unwrap_err(),
            DevoltError::InvalidAuction { .. }
        ));
    }

    #[test]
    fn second_ongoing_auction_rejected() {
        let mut fx = Fixture::new();
        fx.engine().create(u(10), u(10), 200, 100).unwrap();
        let err = fx.engine().create(u(10), u(10), 300, 101).unwrap_err();
        assert!(matches!(err, DevoltError::AuctionAlreadyActive(AuctionId(1))));
    }

    #[test]
    fn update_keeps_absent_fields() {
        let mut fx = Fixture::new();
        fx.engine().create(u(10), u(10), 200, 100).unwrap();
        let update = AuctionUpdate {
            price_limit: Some(u(25)),
            ..AuctionUpdate::default()
        };
        let out = fx.engine().update(AuctionId(1), &update, 150).unwrap();
        assert_eq!(out.notices[0].as_str(), "updated auction with id: 1");
        let a = fx.store.find_auction(AuctionId(1)).unwrap();
        assert_eq!(a.price_limit, u(25));
        assert_eq!(a.credits, u(10));
    }

    #[test]
    fn update_cannot_finish_or_touch_finished() {
        let mut fx = Fixture::new();
        fx.engine().create(u(10), u(10), 200, 100).unwrap();
        let finish = AuctionUpdate {
            state: Some(AuctionState::Finished),
            ..AuctionUpdate::default()
        };
        assert!(fx.engine().update(AuctionId(1), &finish, 150).is_err());
        assert!(matches!(
            fx.engine().update(AuctionId(9), &AuctionUpdate::default(), 150).unwrap_err(),
            DevoltError::AuctionNotFound(_)
        ));
    }

    #[test]
    fn cancel_releases_pending_escrow() {
        let mut fx = Fixture::new();
        fx.engine().create(u(10), u(10), 200, 100).unwrap();
        fx.escrowed_bid(AuctionId(1), 3, 40);

        let cancel = AuctionUpdate {
            state: Some(AuctionState::Cancelled),
            ..AuctionUpdate::default()
        };
        fx.engine().update(AuctionId(1), &cancel, 150).unwrap();

        let bal = fx.wallet.balance(volt(), Address::from_low_u8(3));
        assert_eq!(bal.available, u(40));
        assert!(bal.frozen.is_zero());
        assert_eq!(fx.store.find_bid(BidId(1)).unwrap().state, BidState::Refunded);
        assert!(fx.store.active_auction().is_err());
        fx.wallet.verify_all().unwrap();
    }

    #[test]
    fn delete_removes_bids_and_releases_escrow() {
        let mut fx = Fixture::new();
        fx.engine().create(u(10), u(10), 200, 100).unwrap();
        fx.escrowed_bid(AuctionId(1), 3, 40);
        fx.escrowed_bid(AuctionId(1), 4, 5);

        let out = fx.engine().delete(AuctionId(1)).unwrap();
        assert_eq!(out.notices[0].as_str(), "deleted auction with id: 1");
        assert!(fx.store.bids_for_auction(AuctionId(1)).is_empty());
        assert_eq!(fx.wallet.balance(volt(), Address::from_low_u8(4)).available, u(5));
        assert!(matches!(
            fx.engine().delete(AuctionId(1)).unwrap_err(),
            DevoltError::AuctionNotFound(_)
        ));
    }
}
