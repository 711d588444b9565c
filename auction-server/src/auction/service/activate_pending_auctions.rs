use {
    super::Service,
    crate::auction::entities,
    time::OffsetDateTime,
};

impl Service {
    /// The sweeper's activation pass: pending auctions whose start time has
    /// arrived open for bidding. Runs ahead of the close pass each tick.
    /// Returns how many auctions opened.
    pub async fn activate_pending_auctions(&self) -> usize {
        let due = self.repo.get_pending_auctions_due(OffsetDateTime::now_utc());
        let mut activated = 0;
        for due_auction in due {
            let auction_lock = self.repo.get_or_create_auction_lock(due_auction.id).await;
            let result = {
                let _guard = auction_lock.lock().await;
                let now = OffsetDateTime::now_utc();
                match self.repo.get_auction(due_auction.id) {
                    Some(mut auction)
                        if auction.status == entities::AuctionStatus::Pending
                            && auction.start_time <= now =>
                    {
                        auction.status = entities::AuctionStatus::Active;
                        self.repo.update_auction(auction).await.map(|_| true)
                    }
                    _ => Ok(false),
                }
            };
            match result {
                Ok(true) => activated += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        error = ?err,
                        auction_id = due_auction.id,
                        "Failed to activate auction",
                    );
                }
            }
        }
        if activated > 0 {
            tracing::info!(count = activated, "Activated pending auctions");
        }
        activated
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::service::{
            create_auction::CreateAuctionInput,
            tests::{
                accepting_database,
                quiet_sink,
            },
        },
        bigdecimal::BigDecimal,
        time::Duration,
    };

    fn create_input(start_in: Duration) -> CreateAuctionInput {
        let now = OffsetDateTime::now_utc();
        CreateAuctionInput {
            car_id: 1,
            starting_price: BigDecimal::from(5000),
            reserve_price: None,
            minimum_bid_increment: BigDecimal::from(100),
            start_time: now + start_in,
            end_time: now + Duration::days(7),
            extension_minutes: 5,
            extension_threshold_minutes: 2,
        }
    }

    #[tokio::test]
    async fn a_pending_auction_opens_once_its_start_arrives() {
        let service = Service::new_with_mocks(accepting_database(), quiet_sink());
        let auction = service
            .create_auction(create_input(Duration::hours(1)))
            .await
            .unwrap();
        assert_eq!(auction.status, entities::AuctionStatus::Pending);

        // Not due yet: nothing happens.
        assert_eq!(service.activate_pending_auctions().await, 0);

        // Bring the start time into the past through the working set, as if
        // the clock had caught up.
        service
            .repo
            .in_memory_store
            .auctions
            .get_mut(&auction.id)
            .unwrap()
            .start_time = OffsetDateTime::now_utc() - Duration::seconds(1);

        assert_eq!(service.activate_pending_auctions().await, 1);
        let after = service.repo.get_auction(auction.id).unwrap();
        assert_eq!(after.status, entities::AuctionStatus::Active);

        // A second pass finds nothing left to do.
        assert_eq!(service.activate_pending_auctions().await, 0);
    }
}
