use {
    crate::kernel::entities::{
        AuctionId,
        BidId,
        UserId,
    },
    bigdecimal::BigDecimal,
    time::OffsetDateTime,
};

/// A single accepted bid. Immutable once recorded, except for the winning
/// flag, which the closing sweep flips for at most one bid per auction.
#[derive(Clone, Debug, PartialEq)]
pub struct Bid {
    pub id:             BidId,
    pub auction_id:     AuctionId,
    pub bidder_id:      UserId,
    pub amount:         BigDecimal,
    pub is_winning_bid: bool,
    pub placed_at:      OffsetDateTime,
    pub ip_address:     Option<String>,
}
