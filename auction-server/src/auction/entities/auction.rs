use {
    super::bid::Bid,
    crate::kernel::entities::{
        AuctionId,
        CarId,
        UserId,
    },
    bigdecimal::BigDecimal,
    std::sync::Arc,
    strum::Display,
    time::{
        Duration,
        OffsetDateTime,
    },
    tokio::sync::Mutex,
};

pub type AuctionLock = Arc<Mutex<()>>;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum AuctionStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl AuctionStatus {
    /// Completed and Cancelled are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Completed | AuctionStatus::Cancelled)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Auction {
    pub id:                          AuctionId,
    pub car_id:                      CarId,
    pub starting_price:              BigDecimal,
    pub reserve_price:               Option<BigDecimal>,
    pub minimum_bid_increment:       BigDecimal,
    pub current_bid:                 BigDecimal,
    pub current_bidder_id:           Option<UserId>,
    pub start_time:                  OffsetDateTime,
    pub end_time:                    OffsetDateTime,
    /// The deadline the auction was created (or last updated) with. Anti-snipe
    /// extensions move `end_time` but never this field.
    pub original_end_time:           OffsetDateTime,
    pub extension_minutes:           i64,
    pub extension_threshold_minutes: i64,
    pub total_bids:                  i32,
    pub status:                      AuctionStatus,
    pub created_at:                  OffsetDateTime,
}

impl Auction {
    /// The smallest amount the next bid must reach.
    pub fn minimum_acceptable_bid(&self) -> BigDecimal {
        &self.current_bid + &self.minimum_bid_increment
    }

    pub fn has_ended(&self, now: OffsetDateTime) -> bool {
        self.end_time <= now
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Whether a bid placed at `now` lands inside the anti-snipe window of the
    /// current deadline.
    pub fn in_extension_window(&self, now: OffsetDateTime) -> bool {
        self.end_time - now <= Duration::minutes(self.extension_threshold_minutes)
    }

    /// Records an accepted bid. The anti-snipe check runs against the pre-bid
    /// deadline; when it fires, the deadline re-bases to
    /// `placed_at + extension_minutes`, even where that lands earlier than a
    /// previous extension did. Returns whether the deadline moved.
    pub fn apply_bid(&mut self, bid: &Bid) -> bool {
        let extended = self.in_extension_window(bid.placed_at);
        self.current_bid = bid.amount.clone();
        self.current_bidder_id = Some(bid.bidder_id);
        self.total_bids += 1;
        if extended {
            self.end_time = bid.placed_at + Duration::minutes(self.extension_minutes);
        }
        extended
    }

    /// True when no reserve is set or the standing bid reaches it.
    pub fn reserve_met(&self) -> bool {
        match &self.reserve_price {
            Some(reserve) => self.current_bid >= *reserve,
            None => true,
        }
    }
}
