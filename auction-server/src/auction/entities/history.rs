use {
    super::auction::Auction,
    crate::kernel::entities::{
        AuctionId,
        UserId,
    },
    bigdecimal::BigDecimal,
    time::OffsetDateTime,
};

/// The permanent record written when an auction completes. Exactly one exists
/// per completed auction; cancelled auctions get none.
#[derive(Clone, Debug, PartialEq)]
pub struct AuctionHistory {
    pub auction_id:          AuctionId,
    pub winner_id:           Option<UserId>,
    pub final_price:         BigDecimal,
    pub total_bids:          i32,
    pub unique_participants: i32,
    pub completed_at:        OffsetDateTime,
    pub reserve_met:         bool,
}

impl AuctionHistory {
    /// Builds the closing record for an expired auction. The standing bidder
    /// only wins when the reserve is met.
    pub fn for_closed_auction(
        auction: &Auction,
        unique_participants: i32,
        now: OffsetDateTime,
    ) -> Self {
        let reserve_met = auction.reserve_met();
        Self {
            auction_id: auction.id,
            winner_id: if reserve_met {
                auction.current_bidder_id
            } else {
                None
            },
            final_price: auction.current_bid.clone(),
            total_bids: auction.total_bids,
            unique_participants,
            completed_at: now,
            reserve_met,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::entities::AuctionStatus,
        time::Duration,
    };

    fn dec(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    fn closed_auction(reserve_price: Option<i64>, current_bid: i64) -> Auction {
        let end_time = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        Auction {
            id:                          9,
            car_id:                      4,
            starting_price:              dec(500),
            reserve_price:               reserve_price.map(dec),
            minimum_bid_increment:       dec(100),
            current_bid:                 dec(current_bid),
            current_bidder_id:           Some(31),
            start_time:                  end_time - Duration::days(3),
            end_time,
            original_end_time:           end_time,
            extension_minutes:           5,
            extension_threshold_minutes: 2,
            total_bids:                  4,
            status:                      AuctionStatus::Active,
            created_at:                  end_time - Duration::days(3),
        }
    }

    #[test]
    fn unmet_reserve_closes_without_a_winner() {
        let auction = closed_auction(Some(1000), 900);
        let history = AuctionHistory::for_closed_auction(&auction, 2, auction.end_time);

        assert!(!history.reserve_met);
        assert_eq!(history.winner_id, None);
        assert_eq!(history.final_price, dec(900));
        assert_eq!(history.total_bids, 4);
        assert_eq!(history.unique_participants, 2);
    }

    #[test]
    fn reaching_the_reserve_crowns_the_standing_bidder() {
        let auction = closed_auction(Some(1000), 1000);
        let history = AuctionHistory::for_closed_auction(&auction, 2, auction.end_time);

        assert!(history.reserve_met);
        assert_eq!(history.winner_id, Some(31));
    }

    #[test]
    fn no_reserve_means_the_standing_bidder_wins() {
        let auction = closed_auction(None, 600);
        let history = AuctionHistory::for_closed_auction(&auction, 1, auction.end_time);

        assert!(history.reserve_met);
        assert_eq!(history.winner_id, Some(31));
    }
}
