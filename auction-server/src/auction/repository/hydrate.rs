use {
    super::Repository,
    crate::api::RestError,
    std::sync::atomic::Ordering,
};

impl Repository {
    /// Restores open auctions from the database after a restart and seeds the
    /// id sequences past everything already allocated.
    pub async fn hydrate(&self) -> Result<usize, RestError> {
        let open = self.db.load_open_auctions().await?;
        let restored = open.len();
        for (auction_row, bid_rows) in open {
            let auction = auction_row.get_entity();
            self.in_memory_store.bids.insert(
                auction.id,
                bid_rows.iter().map(|row| row.get_entity()).collect(),
            );
            self.in_memory_store.auctions.insert(auction.id, auction);
        }

        let (auction_watermark, bid_watermark) = self.db.get_id_watermarks().await?;
        self.in_memory_store
            .auction_seq
            .store(auction_watermark, Ordering::SeqCst);
        self.in_memory_store
            .bid_seq
            .store(bid_watermark, Ordering::SeqCst);
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::super::{
            models,
            MockDatabase,
            Repository,
        },
        bigdecimal::BigDecimal,
        time::{
            Duration,
            OffsetDateTime,
        },
    };

    fn auction_row(id: i64) -> models::Auction {
        let end_time = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        models::Auction {
            id,
            car_id: id,
            starting_price: BigDecimal::from(1000),
            reserve_price: None,
            minimum_bid_increment: BigDecimal::from(100),
            current_bid: BigDecimal::from(1100),
            current_bidder_id: Some(2),
            start_time: end_time - Duration::days(7),
            end_time,
            original_end_time: end_time,
            extension_minutes: 5,
            extension_threshold_minutes: 2,
            total_bids: 1,
            status: models::AuctionStatus::Active,
            created_at: end_time - Duration::days(7),
        }
    }

    fn bid_row(id: i64, auction_id: i64) -> models::Bid {
        models::Bid {
            id,
            auction_id,
            bidder_id: 2,
            amount: BigDecimal::from(1100),
            is_winning_bid: false,
            placed_at: OffsetDateTime::UNIX_EPOCH + Duration::days(19_999),
            ip_address: None,
        }
    }

    #[tokio::test]
    async fn hydrate_restores_auctions_and_id_sequences() {
        let mut db = MockDatabase::new();
        db.expect_load_open_auctions()
            .returning(|| Ok(vec![(auction_row(3), vec![bid_row(7, 3)])]));
        db.expect_get_id_watermarks().returning(|| Ok((5, 9)));

        let repo = Repository::new(db);
        let restored = repo.hydrate().await.unwrap();

        assert_eq!(restored, 1);
        let auction = repo.get_auction(3).unwrap();
        assert_eq!(auction.total_bids, 1);
        assert_eq!(repo.get_bids(3).len(), 1);

        // New ids continue past everything the database has seen.
        assert_eq!(repo.next_auction_id(), 6);
        assert_eq!(repo.next_bid_id(), 10);
    }
}
