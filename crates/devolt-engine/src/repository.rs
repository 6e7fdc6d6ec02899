//! Record storage.
//!
//! Engines talk to storage through one trait per record kind. Each `find_*`
//! returns the record's `NotFound` error; writers validate uniqueness.
//!
//! [`MemoryStore`] implements every trait on ordered maps, so its serialized
//! form is canonical and feeds the state root directly.

use std::collections::BTreeMap;

use devolt_types::{
    Address, Auction, AuctionId, Bid, BidId, DevoltError, Order, OrderId, Result, Station,
    StationId, Token, User,
};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

pub trait AuctionRepository {
    /// Reserve the next auction ID.
    fn next_auction_id(&mut self) -> AuctionId;
    /// Persist a new auction.
    ///
    /// # Errors
    /// `AuctionAlreadyActive` if it is `ongoing` while another one is.
    fn insert_auction(&mut self, auction: Auction) -> Result<()>;
    fn find_auction(&self, id: AuctionId) -> Result<Auction>;
    /// Overwrite an existing auction, keeping the active index in step.
    fn update_auction(&mut self, auction: Auction) -> Result<()>;
    fn delete_auction(&mut self, id: AuctionId) -> Result<Auction>;
    /// The single `ongoing` auction, by index.
    fn active_auction(&self) -> Result<Auction>;
    fn auctions(&self) -> Vec<Auction>;
}

pub trait BidRepository {
    fn next_bid_id(&mut self) -> BidId;
    fn insert_bid(&mut self, bid: Bid) -> Result<()>;
    fn find_bid(&self, id: BidId) -> Result<Bid>;
    fn update_bid(&mut self, bid: Bid) -> Result<()>;
    /// Bids of one auction, in ID order.
    fn bids_for_auction(&self, auction_id: AuctionId) -> Vec<Bid>;
    fn delete_bids_for_auction(&mut self, auction_id: AuctionId) -> Vec<Bid>;
}

pub trait OrderRepository {
    fn next_order_id(&mut self) -> OrderId;
    fn insert_order(&mut self, order: Order) -> Result<()>;
    fn find_order(&self, id: OrderId) -> Result<Order>;
    fn update_order(&mut self, order: Order) -> Result<()>;
    fn delete_order(&mut self, id: OrderId) -> Result<Order>;
}

pub trait StationRepository {
    fn insert_station(&mut self, station: Station) -> Result<()>;
    fn find_station(&self, id: &StationId) -> Result<Station>;
    fn update_station(&mut self, station: Station) -> Result<()>;
    fn delete_station(&mut self, id: &StationId) -> Result<Station>;
}

pub trait TokenRepository {
    fn insert_token(&mut self, token: Token) -> Result<()>;
    /// Look a token up by its registry symbol.
    fn find_token(&self, symbol: &str) -> Result<Token>;
    fn update_token(&mut self, token: Token) -> Result<()>;
    fn delete_token(&mut self, symbol: &str) -> Result<Token>;
}

pub trait UserRepository {
    fn insert_user(&mut self, user: User) -> Result<()>;
    fn find_user(&self, address: Address) -> Result<User>;
    fn update_user(&mut self, user: User) -> Result<()>;
    fn delete_user(&mut self, address: Address) -> Result<User>;
}

/// Everything the marketplace reads and writes.
pub trait Repositories:
    AuctionRepository
    + BidRepository
    + OrderRepository
    + StationRepository
    + TokenRepository
    + UserRepository
{
}

impl<T> Repositories for T where
    T: AuctionRepository
        + BidRepository
        + OrderRepository
        + StationRepository
        + TokenRepository
        + UserRepository
{
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Deterministic in-memory store. Cloning it yields an independent staged
/// copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    auctions: BTreeMap<AuctionId, Auction>,
    bids: BTreeMap<BidId, Bid>,
    orders: BTreeMap<OrderId, Order>,
    stations: BTreeMap<StationId, Station>,
    tokens: BTreeMap<String, Token>,
    users: BTreeMap<Address, User>,
    /// Index of the single `ongoing` auction.
    active_auction: Option<AuctionId>,
    next_auction: AuctionId,
    next_bid: BidId,
    next_order: OrderId,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            auctions: BTreeMap::new(),
            bids: BTreeMap::new(),
            orders: BTreeMap::new(),
            stations: BTreeMap::new(),
            tokens: BTreeMap::new(),
            users: BTreeMap::new(),
            active_auction: None,
            next_auction: AuctionId::FIRST,
            next_bid: BidId::FIRST,
            next_order: OrderId::FIRST,
        }
    }

    #[must_use]
    pub fn stations(&self) -> Vec<Station> {
        self.stations.values().cloned().collect()
    }

    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.values().cloned().collect()
    }

    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    /// Point the active index at `auction` if it is ongoing, clear it if
    /// `auction` was the active one and no longer is.
    fn reindex(&mut self, auction: &Auction) -> Result<()> {
        match (auction.is_ongoing(), self.active_auction) {
            (true, Some(active)) if active != auction.id => {
                Err(DevoltError::AuctionAlreadyActive(active))
            }
            (true, _) => {
                self.active_auction = Some(auction.id);
                Ok(())
            }
            (false, Some(active)) if active == auction.id => {
                self.active_auction = None;
                Ok(())
            }
            (false, _) => Ok(()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuctionRepository for MemoryStore {
    fn next_auction_id(&mut self) -> AuctionId {
        let id = self.next_auction;
        self.next_auction = id.next();
        id
    }

    fn insert_auction(&mut self, auction: Auction) -> Result<()> {
        if self.auctions.contains_key(&auction.id) {
            return Err(DevoltError::Duplicate(format!("auction {}", auction.id)));
        }
        self.reindex(&auction)?;
        self.auctions.insert(auction.id, auction);
        Ok(())
    }

    fn find_auction(&self, id: AuctionId) -> Result<Auction> {
        self.auctions
            .get(&id)
            .cloned()
            .ok_or(DevoltError::AuctionNotFound(id))
    }

    fn update_auction(&mut self, auction: Auction) -> Result<()> {
        if !self.auctions.contains_key(&auction.id) {
            return Err(DevoltError::AuctionNotFound(auction.id));
        }
        self.reindex(&auction)?;
        self.auctions.insert(auction.id, auction);
        Ok(())
    }

    fn delete_auction(&mut self, id: AuctionId) -> Result<Auction> {
        let auction = self
            .auctions
            .remove(&id)
            .ok_or(DevoltError::AuctionNotFound(id))?;
        if self.active_auction == Some(id) {
            self.active_auction = None;
        }
        Ok(auction)
    }

    fn active_auction(&self) -> Result<Auction> {
        self.active_auction
            .and_then(|id| self.auctions.get(&id))
            .cloned()
            .ok_or(DevoltError::NoActiveAuction)
    }

    fn auctions(&self) -> Vec<Auction> {
        self.auctions.values().cloned().collect()
    }
}

impl BidRepository for MemoryStore {
    fn next_bid_id(&mut self) -> BidId {
        let id = self.next_bid;
        self.next_bid = id.next();
        id
    }

    fn insert_bid(&mut self, bid: Bid) -> Result<()> {
        if self.bids.contains_key(&bid.id) {
            return Err(DevoltError::Duplicate(format!("bid {}", bid.id)));
        }
        self.bids.insert(bid.id, bid);
        Ok(())
    }

    fn find_bid(&self, id: BidId) -> Result<Bid> {
        self.bids.get(&id).cloned().ok_or(DevoltError::BidNotFound(id))
    }

    fn update_bid(&mut self, bid: Bid) -> Result<()> {
        let slot = self
            .bids
            .get_mut(&bid.id)
            .ok_or(DevoltError::BidNotFound(bid.id))?;
        *slot = bid;
        Ok(())
    }

    fn bids_for_auction(&self, auction_id: AuctionId) -> Vec<Bid> {
        self.bids
            .values()
            .filter(|b| b.auction_id == auction_id)
            .cloned()
            .collect()
    }

    fn delete_bids_for_auction(&mut self, auction_id: AuctionId) -> Vec<Bid> {
        let removed = self.bids_for_auction(auction_id);
        self.bids.retain(|_, b| b.auction_id != auction_id);
        removed
    }
}

impl OrderRepository for MemoryStore {
    fn next_order_id(&mut self) -> OrderId {
        let id = self.next_order;
        self.next_order = id.next();
        id
    }

    fn insert_order(&mut self, order: Order) -> Result<()> {
        if self.orders.contains_key(&order.id) {
            return Err(DevoltError::Duplicate(format!("order {}", order.id)));
        }
        self.orders.insert(order.id, order);
        Ok(())
    }

    fn find_order(&self, id: OrderId) -> Result<Order> {
        self.orders
            .get(&id)
            .cloned()
            .ok_or(DevoltError::OrderNotFound(id))
    }

    fn update_order(&mut self, order: Order) -> Result<()> {
        let slot = self
            .orders
            .get_mut(&order.id)
            .ok_or(DevoltError::OrderNotFound(order.id))?;
        *slot = order;
        Ok(())
    }

    fn delete_order(&mut self, id: OrderId) -> Result<Order> {
        self.orders.remove(&id).ok_or(DevoltError::OrderNotFound(id))
    }
}

impl StationRepository for MemoryStore {
    fn insert_station(&mut self, station: Station) -> Result<()> {
        if self.stations.contains_key(&station.id) {
            return Err(DevoltError::Duplicate(format!("station {}", station.id)));
        }
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    fn find_station(&self, id: &StationId) -> Result<Station> {
        self.stations
            .get(id)
            .cloned()
            .ok_or_else(|| DevoltError::StationNotFound(id.clone()))
    }

    fn update_station(&mut self, station: Station) -> Result<()> {
        let slot = self
            .stations
            .get_mut(&station.id)
            .ok_or_else(|| DevoltError::StationNotFound(station.id.clone()))?;
        *slot = station;
        Ok(())
    }

    fn delete_station(&mut self, id: &StationId) -> Result<Station> {
        self.stations
            .remove(id)
            .ok_or_else(|| DevoltError::StationNotFound(id.clone()))
    }
}

impl TokenRepository for MemoryStore {
    fn insert_token(&mut self, token: Token) -> Result<()> {
        if self.tokens.contains_key(&token.symbol) {
            return Err(DevoltError::Duplicate(format!("contract {}", token.symbol)));
        }
        self.tokens.insert(token.symbol.clone(), token);
        Ok(())
    }

    fn find_token(&self, symbol: &str) -> Result<Token> {
        self.tokens
            .get(symbol)
            .cloned()
            .ok_or_else(|| DevoltError::TokenNotFound(symbol.to_string()))
    }

    fn update_token(&mut self, token: Token) -> Result<()> {
        let slot = self
            .tokens
            .get_mut(&token.symbol)
            .ok_or_else(|| DevoltError::TokenNotFound(token.symbol.clone()))?;
        *slot = token;
        Ok(())
    }

    fn delete_token(&mut self, symbol: &str) -> Result<Token> {
        self.tokens
            .remove(symbol)
            .ok_or_else(|| DevoltError::TokenNotFound(symbol.to_string()))
    }
}

impl UserRepository for MemoryStore {
    fn insert_user(&mut self, user: User) -> Result<()> {
        if self.users.contains_key(&user.address) {
            return Err(DevoltError::Duplicate(format!("user {}", user.address)));
        }
        self.users.insert(user.address, user);
        Ok(())
    }

    fn find_user(&self, address: Address) -> Result<User> {
        self.users
            .get(&address)
            .cloned()
            .ok_or(DevoltError::UserNotFound(address))
    }

    fn update_user(&mut self, user: User) -> Result<()> {
        let slot = self
            .users
            .get_mut(&user.address)
            .ok_or(DevoltError::UserNotFound(user.address))?;
        *slot = user;
        Ok(())
    }

    fn delete_user(&mut self, address: Address) -> Result<User> {
        self.users
            .remove(&address)
            .ok_or(DevoltError::UserNotFound(address))
    }
}

#[cfg(test)]
mod tests {
    use devolt_types::{AuctionState, Role, U256};

    use super::*;

    fn auction(store: &mut MemoryStore, created_at: u64) -> Auction {
        let id = store.next_auction_id();
        Auction::new(
            id,
            U256::from(100u64),
            U256::from(10u64),
            created_at + 100,
            created_at,
        )
        .unwrap()
    }

    #[test]
    fn ids_are_sequential() {
        let mut store = MemoryStore::new();
        assert_eq!(store.next_auction_id(), AuctionId(1));
        assert_eq!(store.next_auction_id(), AuctionId(2));
        assert_eq!(store.next_bid_id(), BidId(1));
        assert_eq!(store.next_order_id(), OrderId(1));
    }

    #[test]
    fn single_active_auction() {
        let mut store = MemoryStore::new();
        let first = auction(&mut store, 1);
        store.insert_auction(first.clone()).unwrap();
        assert_eq!(store.active_auction().unwrap().id, first.id);

        let second = auction(&mut store, 2);
        let err = store.insert_auction(second.clone()).unwrap_err();
        assert!(matches!(err, DevoltError::AuctionAlreadyActive(id) if id == first.id));

        let mut finished = first;
        finished.state = AuctionState::Finished;
        store.update_auction(finished).unwrap();
        assert!(matches!(
            store.active_auction().unwrap_err(),
            DevoltError::NoActiveAuction
        ));

        store.insert_auction(second.clone()).unwrap();
        assert_eq!(store.active_auction().unwrap().id, second.id);
    }

    #[test]
    fn deleting_active_clears_index() {
        let mut store = MemoryStore::new();
        let a = auction(&mut store, 1);
        store.insert_auction(a.clone()).unwrap();
        store.delete_auction(a.id).unwrap();
        assert!(store.active_auction().is_err());
        assert!(matches!(
            store.delete_auction(a.id).unwrap_err(),
            DevoltError::AuctionNotFound(_)
        ));
    }

    #[test]
    fn bids_by_auction() {
        let mut store = MemoryStore::new();
        for (auction_id, n) in [(1u64, 3u64), (2, 2)] {
            for _ in 0..n {
                let id = store.next_bid_id();
                store
                    .insert_bid(Bid::new(
                        id,
                        AuctionId(auction_id),
                        Address::from_low_u8(1),
                        U256::one(),
                        U256::one(),
                        1,
                    ))
                    .unwrap();
            }
        }
        assert_eq!(store.bids_for_auction(AuctionId(1)).len(), 3);
        assert_eq!(store.delete_bids_for_auction(AuctionId(1)).len(), 3);
        assert!(store.bids_for_auction(AuctionId(1)).is_empty());
        assert_eq!(store.bids_for_auction(AuctionId(2)).len(), 2);
    }

    #[test]
    fn registry_not_found_and_duplicates() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.find_token("VOLT").unwrap_err(),
            DevoltError::TokenNotFound(_)
        ));
        store
            .insert_token(Token::new("VOLT", Address::from_low_u8(1), 1).unwrap())
            .unwrap();
        assert!(matches!(
            store
                .insert_token(Token::new("VOLT", Address::from_low_u8(2), 1).unwrap())
                .unwrap_err(),
            DevoltError::Duplicate(_)
        ));

        let user = User::new(Address::from_low_u8(5), Role::User);
        store.insert_user(user.clone()).unwrap();
        assert_eq!(store.find_user(user.address).unwrap(), user);
        assert!(store.insert_user(user).is_err());

        let missing = StationId::new("nope");
        assert!(matches!(
            store.find_station(&missing).unwrap_err(),
            DevoltError::StationNotFound(_)
        ));
    }

    #[test]
    fn snapshot_roundtrips() {
        let mut store = MemoryStore::new();
        let a = auction(&mut store, 1);
        store.insert_auction(a).unwrap();
        store
            .insert_station(Station::dummy("station-1", Address::from_low_u8(8), 10))
            .unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(store, back);
        assert!(back.active_auction().is_ok());
    }
}
