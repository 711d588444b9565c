use {
    super::{
        conclude_auction::ConcludeAuctionInput,
        Service,
    },
    crate::server::SHOULD_EXIT,
    car_auction_api_types::ws::UpdateEvent,
    std::sync::atomic::Ordering,
    time::OffsetDateTime,
};

impl Service {
    /// The sweeper's close pass. Also safe to invoke manually (an admin
    /// force-sweep) and concurrently with itself: each auction's transition
    /// happens once under its own lock, and an auction the other pass already
    /// closed simply drops out here. Returns how many auctions this pass
    /// closed.
    pub async fn close_expired_auctions(&self) -> usize {
        let expired = self.repo.get_expired_auctions(OffsetDateTime::now_utc());
        let mut closed = 0;
        for auction in expired {
            // On shutdown, finish the in-flight close but start no new one.
            if SHOULD_EXIT.load(Ordering::Acquire) {
                break;
            }
            match self
                .conclude_auction(ConcludeAuctionInput {
                    auction_id: auction.id,
                })
                .await
            {
                Ok(true) => closed += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        error = ?err,
                        auction_id = auction.id,
                        "Failed to close expired auction",
                    );
                }
            }
        }
        if closed > 0 {
            tracing::info!(count = closed, "Closed expired auctions");
            self.broadcast(UpdateEvent::AuctionsClosed { count: closed });
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::{
                repository::MockDatabase,
                service::{
                    create_auction::CreateAuctionInput,
                    place_bid::PlaceBidInput,
                    tests::quiet_sink,
                    Service,
                },
            },
            notification::MockNotificationSink,
        },
        bigdecimal::BigDecimal,
        futures::future::join_all,
        mockall::predicate::eq,
        time::Duration,
    };

    fn dec(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    fn expiring_auction(reserve_price: Option<i64>) -> CreateAuctionInput {
        let now = OffsetDateTime::now_utc();
        CreateAuctionInput {
            car_id: 1,
            starting_price: dec(500),
            reserve_price: reserve_price.map(dec),
            minimum_bid_increment: dec(100),
            start_time: now - Duration::hours(2),
            // Already past due; the sweep may close it on its next pass.
            end_time: now - Duration::minutes(1),
            extension_minutes: 5,
            extension_threshold_minutes: 0,
        }
    }

    fn bid(auction_id: i64, bidder_id: i64, amount: i64) -> PlaceBidInput {
        PlaceBidInput {
            auction_id,
            bidder_id,
            amount: dec(amount),
            ip_address: None,
        }
    }

    /// Seeds an expired auction carrying bids from two bidders. Bids are
    /// placed while the deadline is still ahead, then the deadline is moved
    /// into the past through the working set.
    async fn seed_expired_auction(service: &Service, reserve_price: Option<i64>) -> i64 {
        let now = OffsetDateTime::now_utc();
        let mut input = expiring_auction(reserve_price);
        input.end_time = now + Duration::hours(1);
        let auction = service.create_auction(input).await.unwrap();
        service.place_bid(bid(auction.id, 2, 600)).await.unwrap();
        service.place_bid(bid(auction.id, 3, 700)).await.unwrap();
        service.place_bid(bid(auction.id, 2, 900)).await.unwrap();
        service
            .repo
            .in_memory_store
            .auctions
            .get_mut(&auction.id)
            .unwrap()
            .end_time = now - Duration::seconds(1);
        auction.id
    }

    #[tokio::test]
    async fn closing_builds_the_history_and_crowns_the_winner() {
        let mut db = MockDatabase::new();
        db.expect_add_auction().returning(|_| Ok(()));
        db.expect_add_bid().returning(|_, _| Ok(()));
        db.expect_conclude_auction()
            .withf(|auction, history, winning_bid| {
                auction.status == crate::auction::entities::AuctionStatus::Completed
                    && history.winner_id == Some(2)
                    && history.final_price == BigDecimal::from(900)
                    && history.total_bids == 3
                    && history.unique_participants == 2
                    && history.reserve_met
                    && winning_bid.is_some()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify_outbid().returning(|_, _, _| Ok(()));
        sink.expect_notify_won()
            .with(eq(2), eq(1), eq(dec(900)))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = Service::new_with_mocks(db, sink);
        let auction_id = seed_expired_auction(&service, None).await;

        let mut updates = service.event_sender.subscribe();
        assert_eq!(service.close_expired_auctions().await, 1);
        service.drain_tasks().await;

        // The auction left the working set for good.
        assert!(service.repo.get_auction(auction_id).is_none());
        assert!(service.repo.get_bids(auction_id).is_empty());

        assert_eq!(
            updates.recv().await.unwrap(),
            UpdateEvent::AuctionClosed {
                auction_id,
                winner_id: Some(2),
                final_price: dec(900),
            }
        );
        assert_eq!(
            updates.recv().await.unwrap(),
            UpdateEvent::AuctionsClosed { count: 1 }
        );
    }

    #[tokio::test]
    async fn an_unmet_reserve_closes_without_a_winner() {
        let mut db = MockDatabase::new();
        db.expect_add_auction().returning(|_| Ok(()));
        db.expect_add_bid().returning(|_, _| Ok(()));
        db.expect_conclude_auction()
            .withf(|_, history, winning_bid| {
                history.winner_id.is_none() && !history.reserve_met && winning_bid.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut sink = MockNotificationSink::new();
        sink.expect_notify_outbid().returning(|_, _, _| Ok(()));
        // Nobody wins, nobody gets the winner notification.
        sink.expect_notify_won().times(0);

        let service = Service::new_with_mocks(db, sink);
        seed_expired_auction(&service, Some(1000)).await;

        assert_eq!(service.close_expired_auctions().await, 1);
        service.drain_tasks().await;
    }

    #[tokio::test]
    async fn an_auction_with_no_bids_closes_without_a_winner() {
        let mut db = MockDatabase::new();
        db.expect_add_auction().returning(|_| Ok(()));
        db.expect_conclude_auction()
            .withf(|_, history, winning_bid| {
                history.winner_id.is_none()
                    && history.reserve_met
                    && history.total_bids == 0
                    && history.unique_participants == 0
                    && winning_bid.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = Service::new_with_mocks(db, quiet_sink());
        service
            .create_auction(expiring_auction(None))
            .await
            .unwrap();

        assert_eq!(service.close_expired_auctions().await, 1);
        service.drain_tasks().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_sweeps_close_each_auction_once() {
        let mut db = MockDatabase::new();
        db.expect_add_auction().returning(|_| Ok(()));
        db.expect_add_bid().returning(|_, _| Ok(()));
        // The whole point: one history record, ever.
        db.expect_conclude_auction()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = Service::new_with_mocks(db, quiet_sink());
        seed_expired_auction(&service, None).await;

        let sweeps: Vec<_> = (0..2)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.close_expired_auctions().await })
            })
            .collect();
        let closed: usize = join_all(sweeps)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .sum();

        assert_eq!(closed, 1);
        service.drain_tasks().await;
    }

    #[tokio::test]
    async fn a_failing_close_does_not_abort_the_batch() {
        let mut db = MockDatabase::new();
        db.expect_add_auction().returning(|_| Ok(()));
        // First conclude attempt fails, the second succeeds.
        db.expect_conclude_auction()
            .times(1)
            .returning(|_, _, _| Err(crate::api::RestError::TemporarilyUnavailable));
        db.expect_conclude_auction()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = Service::new_with_mocks(db, quiet_sink());
        service
            .create_auction(expiring_auction(None))
            .await
            .unwrap();
        service
            .create_auction(CreateAuctionInput {
                car_id: 2,
                ..expiring_auction(None)
            })
            .await
            .unwrap();

        // One of the two closes; the failed one stays eligible for the next
        // pass.
        assert_eq!(service.close_expired_auctions().await, 1);
        service.drain_tasks().await;
    }
}
