use {
    super::Service,
    car_auction_api_types::ws::UpdateEvent,
    time::OffsetDateTime,
};

impl Service {
    /// The sweeper's ending-soon pass. Fires again on every tick while an
    /// auction stays inside the window; consumers are expected to dedupe.
    pub async fn notify_ending_soon(&self) {
        let now = OffsetDateTime::now_utc();
        let ending = self
            .repo
            .get_ending_soon_auctions(now, self.config.ending_soon_window);
        for auction in ending {
            let minutes_remaining = minutes_remaining(auction.end_time, now);
            self.broadcast(UpdateEvent::AuctionEndingSoon {
                auction_id: auction.id,
                minutes_remaining,
            });
            self.task_tracker.spawn({
                let service = self.clone();
                let auction_id = auction.id;
                async move {
                    if let Err(err) = service
                        .notifier
                        .notify_ending_soon(auction_id, minutes_remaining)
                        .await
                    {
                        tracing::error!(
                            error = ?err,
                            auction_id,
                            "Failed to send ending soon notification",
                        );
                    }
                }
            });
        }
    }
}

/// Minutes until the deadline, rounded up so "30 seconds left" reads as one
/// minute, never zero.
fn minutes_remaining(end_time: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let seconds = (end_time - now).whole_seconds();
    (seconds + 59).div_euclid(60)
}
