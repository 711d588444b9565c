use {
    super::{
        verification,
        Service,
    },
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::{
            AuctionId,
            UserId,
        },
    },
    bigdecimal::BigDecimal,
    car_auction_api_types::{
        bid::BidOutcome,
        ws::UpdateEvent,
    },
    time::OffsetDateTime,
};

pub struct PlaceBidInput {
    pub auction_id: AuctionId,
    pub bidder_id:  UserId,
    pub amount:     BigDecimal,
    pub ip_address: Option<String>,
}

impl Service {
    /// Validates and applies one bid. All writes to one auction serialize on
    /// that auction's lock, so the checks always see the latest committed
    /// snapshot; the lock is released before any notification goes out.
    #[tracing::instrument(
        skip_all,
        fields(
            auction_id = input.auction_id,
            bidder_id = input.bidder_id,
            bid_id
        )
    )]
    pub async fn place_bid(&self, input: PlaceBidInput) -> Result<BidOutcome, RestError> {
        let auction_lock = self.repo.get_or_create_auction_lock(input.auction_id).await;
        let (outcome, previous_bidder) = {
            let _guard = auction_lock.lock().await;
            let now = OffsetDateTime::now_utc();
            let mut auction = self
                .repo
                .get_auction(input.auction_id)
                .ok_or(RestError::AuctionNotFound(input.auction_id))?;
            verification::verify_bid(&auction, &input, now)?;

            let previous_bidder = auction.current_bidder_id;
            let bid = entities::Bid {
                id: self.repo.next_bid_id(),
                auction_id: input.auction_id,
                bidder_id: input.bidder_id,
                amount: input.amount,
                is_winning_bid: false,
                placed_at: now,
                ip_address: input.ip_address,
            };
            let time_extended = auction.apply_bid(&bid);
            let outcome = BidOutcome {
                bid_id:          bid.id,
                amount:          bid.amount.clone(),
                new_current_bid: auction.current_bid.clone(),
                total_bids:      auction.total_bids,
                new_end_time:    time_extended.then_some(auction.end_time),
                time_extended,
            };
            self.repo.add_bid(bid, auction).await?;
            (outcome, previous_bidder)
        };
        tracing::Span::current().record("bid_id", outcome.bid_id);

        if let Some(previous_bidder) = previous_bidder.filter(|prev| *prev != input.bidder_id) {
            self.task_tracker.spawn({
                let service = self.clone();
                let auction_id = input.auction_id;
                let new_amount = outcome.new_current_bid.clone();
                async move {
                    if let Err(err) = service
                        .notifier
                        .notify_outbid(previous_bidder, auction_id, new_amount)
                        .await
                    {
                        tracing::error!(
                            error = ?err,
                            auction_id,
                            user_id = previous_bidder,
                            "Failed to notify outbid bidder",
                        );
                    }
                }
            });
        }
        self.broadcast(UpdateEvent::NewBid {
            auction_id: input.auction_id,
            outcome:    outcome.clone(),
        });
        Ok(outcome)
    }
}
