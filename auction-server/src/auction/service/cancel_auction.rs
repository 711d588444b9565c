use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
    car_auction_api_types::ws::UpdateEvent,
};

pub struct CancelAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// Cancels an open auction. Terminal and irreversible, writes no history
    /// record, and tells every distinct bidder exactly once. Cancelling an
    /// already-cancelled auction is a no-op; a completed one cannot be
    /// cancelled.
    #[tracing::instrument(skip_all, fields(auction_id = input.auction_id))]
    pub async fn cancel_auction(&self, input: CancelAuctionInput) -> Result<(), RestError> {
        let auction_lock = self.repo.get_or_create_auction_lock(input.auction_id).await;
        let bidders = {
            let _guard = auction_lock.lock().await;
            let auction = self
                .repo
                .get_auction_with_fallback(input.auction_id)
                .await?
                .ok_or(RestError::AuctionNotFound(input.auction_id))?;
            match auction.status {
                entities::AuctionStatus::Completed => {
                    return Err(RestError::invalid_state(
                        "cannot cancel a completed auction",
                    ));
                }
                entities::AuctionStatus::Cancelled => return Ok(()),
                entities::AuctionStatus::Pending | entities::AuctionStatus::Active => {}
            }

            let bidders = self.repo.get_distinct_bidders(input.auction_id);
            let mut auction = auction;
            auction.status = entities::AuctionStatus::Cancelled;
            self.repo.cancel_auction(auction).await?;
            bidders
        };
        // The auction is terminal; release our handle so the lock entry can
        // be dropped.
        drop(auction_lock);
        self.repo.remove_auction_lock(input.auction_id).await;

        for bidder in bidders {
            self.task_tracker.spawn({
                let service = self.clone();
                let auction_id = input.auction_id;
                async move {
                    if let Err(err) = service.notifier.notify_cancelled(bidder, auction_id).await {
                        tracing::error!(
                            error = ?err,
                            auction_id,
                            user_id = bidder,
                            "Failed to notify bidder of cancellation",
                        );
                    }
                }
            });
        }
        self.broadcast(UpdateEvent::AuctionCancelled {
            auction_id: input.auction_id,
        });
        tracing::info!(auction_id = input.auction_id, "Auction cancelled");
        Ok(())
    }
}
