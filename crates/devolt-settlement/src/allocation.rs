//! Pure deterministic auction allocation.
//!
//! ```text
//! allocate(supply, bids, policy) -> Allocation
//! ```
//!
//! Bids are ranked by price (direction per [`RankingPolicy`]), ties broken
//! by creation order (`created_at`, then `id`). The supply is walked in rank
//! order: bids that fit entirely are `filled`, the one bid straddling the
//! remaining supply is `partially_filled`, every later bid is `refunded`.
//! Non-pending bids are ignored.

use std::cmp::Ordering;

use devolt_types::{Address, Bid, BidId, BidState, RankingPolicy, U256};
use tracing::debug;

/// Outcome for a single bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub bid_id: BidId,
    pub bidder: Address,
    pub price: U256,
    /// Credits allocated to the bid.
    pub filled: U256,
    /// Credits returned to the bidder.
    pub refunded: U256,
    pub state: BidState,
}

/// Result of settling one auction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// One entry per pending bid, in rank order.
    pub fills: Vec<Fill>,
    pub total_filled: U256,
    pub total_refunded: U256,
}

impl Allocation {
    pub fn fill_for(&self, bid_id: BidId) -> Option<&Fill> {
        self.fills.iter().find(|f| f.bid_id == bid_id)
    }

    pub fn partial_fills(&self) -> impl Iterator<Item = &Fill> {
        self.fills
            .iter()
            .filter(|f| f.state == BidState::PartiallyFilled)
    }
}

/// Rank two bids under `policy`.
#[must_use]
pub fn rank(policy: RankingPolicy, a: &Bid, b: &Bid) -> Ordering {
    let by_price = match policy {
        RankingPolicy::HighestPriceFirst => b.price.cmp(&a.price),
        RankingPolicy::LowestPriceFirst => a.price.cmp(&b.price),
    };
    by_price
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Allocate `supply` credits across `bids`.
///
/// Sum of fills never exceeds `supply`, and for every bid
/// `filled + refunded == credits`.
#[must_use]
pub fn allocate(supply: U256, bids: &[Bid], policy: RankingPolicy) -> Allocation {
    let mut ranked: Vec<&Bid> = bids.iter().filter(|b| b.is_pending()).collect();
    ranked.sort_by(|a, b| rank(policy, a, b));

    let mut remaining = supply;
    let mut allocation = Allocation::default();

    for bid in ranked {
        let filled = bid.credits.min(remaining);
        let refunded = bid.credits - filled;
        remaining -= filled;

        let state = if refunded.is_zero() {
            BidState::Filled
        } else if filled.is_zero() {
            BidState::Refunded
        } else {
            BidState::PartiallyFilled
        };

        debug!(
            bid_id = %bid.id,
            price = %bid.price,
            filled = %filled,
            refunded = %refunded,
            state = %state,
            "Allocated bid"
        );

        allocation.total_filled = allocation.total_filled.saturating_add(filled);
        allocation.total_refunded = allocation.total_refunded.saturating_add(refunded);
        allocation.fills.push(Fill {
            bid_id: bid.id,
            bidder: bid.bidder,
            price: bid.price,
            filled,
            refunded,
            state,
        });
    }

    allocation
}

#[cfg(test)]
mod tests {
    use devolt_types::AuctionId;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    fn bid(id: u64, credits: u64, price: u64, created_at: u64) -> Bid {
        Bid::new(
            BidId(id),
            AuctionId(1),
            Address::from_low_u8(u8::try_from(id).unwrap()),
            u(credits),
            u(price),
            created_at,
        )
    }

    #[test]
    fn empty_bids_allocate_nothing() {
        let a = allocate(u(100), &[], RankingPolicy::HighestPriceFirst);
        assert!(a.fills.is_empty());
        assert!(a.total_filled.is_zero());
    }

    #[test]
    fn six_bids_exactly_one_partial() {
        let bids = vec![
            bid(1, 30, 900, 1),
            bid(2, 30, 1000, 2),
            bid(3, 30, 800, 3),
            bid(4, 30, 950, 4),
            bid(5, 30, 700, 5),
            bid(6, 30, 850, 6),
        ];
        let a = allocate(u(100), &bids, RankingPolicy::HighestPriceFirst);

        let order: Vec<u64> = a.fills.iter().map(|f| f.bid_id.0).collect();
        assert_eq!(order, vec![2, 4, 1, 6, 3, 5]);

        assert_eq!(a.fill_for(BidId(2)).unwrap().state, BidState::Filled);
        assert_eq!(a.fill_for(BidId(4)).unwrap().state, BidState::Filled);
        assert_eq!(a.fill_for(BidId(1)).unwrap().state, BidState::Filled);
        let partial = a.fill_for(BidId(6)).unwrap();
        assert_eq!(partial.state, BidState::PartiallyFilled);
        assert_eq!(partial.filled, u(10));
        assert_eq!(partial.refunded, u(20));
        assert_eq!(a.fill_for(BidId(3)).unwrap().state, BidState::Refunded);
        assert_eq!(a.fill_for(BidId(5)).unwrap().refunded, u(30));

        assert_eq!(a.partial_fills().count(), 1);
        assert_eq!(a.total_filled, u(100));
        assert_eq!(a.total_refunded, u(80));
    }

    #[test]
    fn lowest_price_first_reverses_ranking() {
        let bids = vec![bid(1, 10, 5, 1), bid(2, 10, 3, 2)];
        let a = allocate(u(10), &bids, RankingPolicy::LowestPriceFirst);
        assert_eq!(a.fill_for(BidId(2)).unwrap().state, BidState::Filled);
        assert_eq!(a.fill_for(BidId(1)).unwrap().state, BidState::Refunded);
    }

    #[test]
    fn ties_break_by_creation_then_id() {
        let bids = vec![bid(3, 10, 5, 2), bid(2, 10, 5, 2), bid(1, 10, 5, 3)];
        let a = allocate(u(15), &bids, RankingPolicy::HighestPriceFirst);
        let order: Vec<u64> = a.fills.iter().map(|f| f.bid_id.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(a.fill_for(BidId(3)).unwrap().state, BidState::PartiallyFilled);
    }

    #[test]
    fn undersubscribed_fills_everyone() {
        let bids = vec![bid(1, 10, 5, 1), bid(2, 10, 4, 2)];
        let a = allocate(u(1000), &bids, RankingPolicy::HighestPriceFirst);
        assert!(a.fills.iter().all(|f| f.state == BidState::Filled));
        assert_eq!(a.total_filled, u(20));
        assert_eq!(a.partial_fills().count(), 0);
    }

    #[test]
    fn non_pending_bids_are_skipped() {
        let mut settled = bid(1, 10, 9, 1);
        settled.state = BidState::Filled;
        let a = allocate(u(10), &[settled, bid(2, 10, 5, 2)], RankingPolicy::HighestPriceFirst);
        assert_eq!(a.fills.len(), 1);
        assert_eq!(a.fills[0].bid_id, BidId(2));
    }

    #[test]
    fn randomized_conservation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let supply = rng.gen_range(1..500u64);
            let n = rng.gen_range(0..12u64);
            let bids: Vec<Bid> = (1..=n)
                .map(|i| bid(i, rng.gen_range(1..100), rng.gen_range(1..50), rng.gen_range(0..5)))
                .collect();
            let deposits = bids.iter().fold(U256::zero(), |acc, b| acc + b.credits);

            let a = allocate(u(supply), &bids, RankingPolicy::HighestPriceFirst);

            assert!(a.total_filled <= u(supply));
            assert_eq!(a.total_filled + a.total_refunded, deposits);
            assert!(a.partial_fills().count() <= 1);
            for f in &a.fills {
                let original = bids.iter().find(|b| b.id == f.bid_id).unwrap();
                assert_eq!(f.filled + f.refunded, original.credits);
            }
        }
    }
}
