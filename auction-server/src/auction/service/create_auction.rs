use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::CarId,
    },
    bigdecimal::BigDecimal,
    time::OffsetDateTime,
};

pub struct CreateAuctionInput {
    pub car_id:                      CarId,
    pub starting_price:              BigDecimal,
    pub reserve_price:               Option<BigDecimal>,
    pub minimum_bid_increment:       BigDecimal,
    pub start_time:                  OffsetDateTime,
    pub end_time:                    OffsetDateTime,
    pub extension_minutes:           i64,
    pub extension_threshold_minutes: i64,
}

impl Service {
    /// A car carries at most one open auction at a time. An auction whose
    /// start has already arrived opens immediately; otherwise it waits as
    /// pending until the sweeper activates it.
    #[tracing::instrument(skip_all, fields(car_id = input.car_id, auction_id))]
    pub async fn create_auction(
        &self,
        input: CreateAuctionInput,
    ) -> Result<entities::Auction, RestError> {
        let now = OffsetDateTime::now_utc();
        if self.repo.has_open_auction_for_car(input.car_id) {
            return Err(RestError::Conflict(input.car_id));
        }

        let status = if input.start_time <= now {
            entities::AuctionStatus::Active
        } else {
            entities::AuctionStatus::Pending
        };
        let auction = entities::Auction {
            id: self.repo.next_auction_id(),
            car_id: input.car_id,
            current_bid: input.starting_price.clone(),
            starting_price: input.starting_price,
            reserve_price: input.reserve_price,
            minimum_bid_increment: input.minimum_bid_increment,
            current_bidder_id: None,
            start_time: input.start_time,
            end_time: input.end_time,
            original_end_time: input.end_time,
            extension_minutes: input.extension_minutes,
            extension_threshold_minutes: input.extension_threshold_minutes,
            total_bids: 0,
            status,
            created_at: now,
        };
        let auction = self.repo.add_auction(auction).await?;
        tracing::Span::current().record("auction_id", auction.id);
        tracing::info!(
            auction_id = auction.id,
            car_id = auction.car_id,
            status = %auction.status,
            "Auction created",
        );
        Ok(auction)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::auction::service::tests::{
            accepting_database,
            quiet_sink,
        },
        time::Duration,
    };

    fn dec(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    fn create_input(car_id: i64, start_in: Duration) -> CreateAuctionInput {
        let now = OffsetDateTime::now_utc();
        CreateAuctionInput {
            car_id,
            starting_price: dec(5000),
            reserve_price: None,
            minimum_bid_increment: dec(100),
            start_time: now + start_in,
            end_time: now + start_in + Duration::days(7),
            extension_minutes: 5,
            extension_threshold_minutes: 2,
        }
    }

    #[tokio::test]
    async fn an_arrived_start_time_opens_the_auction_immediately() {
        let service = Service::new_with_mocks(accepting_database(), quiet_sink());
        let auction = service
            .create_auction(create_input(1, Duration::hours(-1)))
            .await
            .unwrap();

        assert_eq!(auction.status, entities::AuctionStatus::Active);
        assert_eq!(auction.current_bid, dec(5000));
        assert_eq!(auction.original_end_time, auction.end_time);
        assert_eq!(auction.total_bids, 0);
    }

    #[tokio::test]
    async fn a_future_start_time_leaves_the_auction_pending() {
        let service = Service::new_with_mocks(accepting_database(), quiet_sink());
        let auction = service
            .create_auction(create_input(1, Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(auction.status, entities::AuctionStatus::Pending);
    }

    #[tokio::test]
    async fn a_car_cannot_carry_two_open_auctions() {
        let service = Service::new_with_mocks(accepting_database(), quiet_sink());
        service
            .create_auction(create_input(1, Duration::hours(-1)))
            .await
            .unwrap();

        let result = service.create_auction(create_input(1, Duration::hours(1))).await;
        assert_eq!(result, Err(RestError::Conflict(1)));

        // A different car is unaffected.
        service
            .create_auction(create_input(2, Duration::hours(-1)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn a_cancelled_auction_frees_the_car() {
        let service = Service::new_with_mocks(accepting_database(), quiet_sink());
        let auction = service
            .create_auction(create_input(1, Duration::hours(-1)))
            .await
            .unwrap();
        service
            .cancel_auction(crate::auction::service::cancel_auction::CancelAuctionInput {
                auction_id: auction.id,
            })
            .await
            .unwrap();

        service
            .create_auction(create_input(1, Duration::hours(-1)))
            .await
            .unwrap();
        service.drain_tasks().await;
    }
}
