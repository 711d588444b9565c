use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
    car_auction_api_types::ws::UpdateEvent,
    time::OffsetDateTime,
};

pub struct ConcludeAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// Closes one expired auction exactly once. Eligibility is re-checked
    /// under the auction's lock, so overlapping sweeps cannot double-close
    /// and a bid that already extended the deadline keeps the auction alive.
    /// Returns whether this call performed the close.
    #[tracing::instrument(skip_all, fields(auction_id = input.auction_id))]
    pub async fn conclude_auction(&self, input: ConcludeAuctionInput) -> Result<bool, RestError> {
        let auction_lock = self.repo.get_or_create_auction_lock(input.auction_id).await;
        let (auction, history) = {
            let _guard = auction_lock.lock().await;
            let now = OffsetDateTime::now_utc();
            let Some(mut auction) = self.repo.get_auction(input.auction_id) else {
                return Ok(false);
            };
            if auction.status != entities::AuctionStatus::Active || !auction.has_ended(now) {
                return Ok(false);
            }

            let unique_participants = self.repo.get_distinct_bidders(input.auction_id).len() as i32;
            auction.status = entities::AuctionStatus::Completed;
            let history =
                entities::AuctionHistory::for_closed_auction(&auction, unique_participants, now);
            let winning_bid = history.winner_id.and_then(|winner| {
                // The winner's highest bid is the one that carries the flag.
                self.repo
                    .get_bids(input.auction_id)
                    .into_iter()
                    .filter(|bid| bid.bidder_id == winner)
                    .max_by(|a, b| a.amount.cmp(&b.amount))
                    .map(|bid| bid.id)
            });
            self.repo
                .conclude_auction(auction.clone(), history.clone(), winning_bid)
                .await?;
            (auction, history)
        };
        // The auction is terminal; release our handle so the lock entry can
        // be dropped.
        drop(auction_lock);
        self.repo.remove_auction_lock(input.auction_id).await;

        if let Some(winner) = history.winner_id {
            self.task_tracker.spawn({
                let service = self.clone();
                let auction_id = auction.id;
                let final_price = history.final_price.clone();
                async move {
                    if let Err(err) = service
                        .notifier
                        .notify_won(winner, auction_id, final_price)
                        .await
                    {
                        tracing::error!(
                            error = ?err,
                            auction_id,
                            user_id = winner,
                            "Failed to notify auction winner",
                        );
                    }
                }
            });
        }
        self.broadcast(UpdateEvent::AuctionClosed {
            auction_id:  auction.id,
            winner_id:   history.winner_id,
            final_price: history.final_price.clone(),
        });
        tracing::info!(
            auction_id = auction.id,
            winner_id = ?history.winner_id,
            final_price = %history.final_price,
            reserve_met = history.reserve_met,
            "Auction concluded",
        );
        Ok(true)
    }
}
