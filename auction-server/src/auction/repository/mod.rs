use {
    super::entities,
    crate::kernel::entities::{
        AuctionId,
        BidId,
    },
    dashmap::DashMap,
    std::{
        collections::HashMap,
        sync::atomic::{
            AtomicI64,
            Ordering,
        },
    },
    tokio::sync::Mutex,
};

mod add_auction;
mod add_bid;
mod cancel_auction;
mod conclude_auction;
mod get_auction;
mod get_bids;
mod get_distinct_bidders;
mod get_ending_soon_auctions;
mod get_expired_auctions;
mod get_history;
mod get_or_create_auction_lock;
mod get_pending_auctions_due;
mod get_winning_bid;
mod has_open_auction_for_car;
mod hydrate;
mod models;
mod remove_auction_lock;
mod update_auction;

pub use models::*;

/// Authoritative working state for open auctions. Terminal auctions live only
/// in the database.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub auctions:      DashMap<AuctionId, entities::Auction>,
    pub bids:          DashMap<AuctionId, Vec<entities::Bid>>,
    pub auction_locks: Mutex<HashMap<AuctionId, entities::AuctionLock>>,

    auction_seq: AtomicI64,
    bid_seq:     AtomicI64,
}

#[derive(Debug)]
pub struct Repository {
    pub in_memory_store: InMemoryStore,
    db:                  Box<dyn Database>,
}

impl Repository {
    pub fn new(db: impl Database) -> Self {
        Self {
            in_memory_store: InMemoryStore::default(),
            db:              Box::new(db),
        }
    }

    pub fn next_auction_id(&self) -> AuctionId {
        self.in_memory_store.auction_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn next_bid_id(&self) -> BidId {
        self.in_memory_store.bid_seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}
