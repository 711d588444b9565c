use {
    crate::{
        bid::BidOutcome,
        AuctionId,
        UserId,
    },
    bigdecimal::BigDecimal,
    serde::{
        Deserialize,
        Serialize,
    },
};

/// Updates pushed to live auction watchers. The transport (websocket hub,
/// SSE, ...) subscribes to the engine's broadcast channel and forwards these
/// verbatim; the engine never waits for delivery.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateEvent {
    NewBid {
        auction_id: AuctionId,
        outcome:    BidOutcome,
    },
    AuctionClosed {
        auction_id:  AuctionId,
        winner_id:   Option<UserId>,
        final_price: BigDecimal,
    },
    AuctionEndingSoon {
        auction_id:        AuctionId,
        minutes_remaining: i64,
    },
    AuctionsClosed {
        count: usize,
    },
    AuctionCancelled {
        auction_id: AuctionId,
    },
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        bigdecimal::BigDecimal,
    };

    #[test]
    fn update_events_are_tagged_by_type() {
        let update = UpdateEvent::AuctionClosed {
            auction_id:  7,
            winner_id:   Some(3),
            final_price: BigDecimal::from(10500),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "auction_closed");
        assert_eq!(value["auction_id"], 7);
        assert_eq!(value["winner_id"], 3);

        let update = UpdateEvent::AuctionEndingSoon {
            auction_id:        7,
            minutes_remaining: 4,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["type"], "auction_ending_soon");
        assert_eq!(value["minutes_remaining"], 4);
    }

    #[test]
    fn new_bid_round_trips() {
        let update = UpdateEvent::NewBid {
            auction_id: 1,
            outcome:    crate::bid::BidOutcome {
                bid_id:          42,
                amount:          BigDecimal::from(10100),
                new_current_bid: BigDecimal::from(10100),
                total_bids:      3,
                new_end_time:    None,
                time_extended:   false,
            },
        };
        let json = serde_json::to_string(&update).unwrap();
        let back: UpdateEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(update, back);
    }
}
