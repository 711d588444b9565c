use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
    bigdecimal::BigDecimal,
    time::OffsetDateTime,
};

/// Every field is optional; only the set ones change.
#[derive(Default)]
pub struct UpdateAuctionInput {
    pub auction_id:                  AuctionId,
    pub starting_price:              Option<BigDecimal>,
    pub reserve_price:               Option<BigDecimal>,
    pub minimum_bid_increment:       Option<BigDecimal>,
    pub start_time:                  Option<OffsetDateTime>,
    pub end_time:                    Option<OffsetDateTime>,
    pub extension_minutes:           Option<i64>,
    pub extension_threshold_minutes: Option<i64>,
}

impl Service {
    /// Bidders are protected from rule changes: once an active auction has a
    /// bid, it can no longer be updated.
    #[tracing::instrument(skip_all, fields(auction_id = input.auction_id))]
    pub async fn update_auction(
        &self,
        input: UpdateAuctionInput,
    ) -> Result<entities::Auction, RestError> {
        let auction_lock = self.repo.get_or_create_auction_lock(input.auction_id).await;
        let _guard = auction_lock.lock().await;

        let mut auction = self
            .repo
            .get_auction(input.auction_id)
            .ok_or(RestError::AuctionNotFound(input.auction_id))?;
        if auction.status == entities::AuctionStatus::Active && auction.total_bids > 0 {
            return Err(RestError::invalid_state(
                "cannot update an auction that already has bids",
            ));
        }

        if let Some(starting_price) = input.starting_price {
            // No bids exist here, so the standing bid is still the starting
            // price and moves with it.
            auction.current_bid = starting_price.clone();
            auction.starting_price = starting_price;
        }
        if let Some(reserve_price) = input.reserve_price {
            auction.reserve_price = Some(reserve_price);
        }
        if let Some(minimum_bid_increment) = input.minimum_bid_increment {
            auction.minimum_bid_increment = minimum_bid_increment;
        }
        if let Some(start_time) = input.start_time {
            auction.start_time = start_time;
        }
        if let Some(end_time) = input.end_time {
            // A fresh deadline is a new baseline, not an extension.
            auction.end_time = end_time;
            auction.original_end_time = end_time;
        }
        if let Some(extension_minutes) = input.extension_minutes {
            auction.extension_minutes = extension_minutes;
        }
        if let Some(extension_threshold_minutes) = input.extension_threshold_minutes {
            auction.extension_threshold_minutes = extension_threshold_minutes;
        }

        self.repo.update_auction(auction).await
    }
}
