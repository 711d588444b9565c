use {
    crate::BidId,
    bigdecimal::BigDecimal,
    serde::{
        Deserialize,
        Serialize,
    },
    time::OffsetDateTime,
};

/// The result of an accepted bid, returned to the bidder and broadcast to
/// everyone watching the auction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BidOutcome {
    pub bid_id:          BidId,
    pub amount:          BigDecimal,
    pub new_current_bid: BigDecimal,
    pub total_bids:      i32,
    /// Present only when the bid landed inside the anti-snipe window and
    /// pushed the deadline back.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub new_end_time:    Option<OffsetDateTime>,
    pub time_extended:   bool,
}
