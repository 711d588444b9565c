#[cfg(test)]
use mockall::automock;
use {
    super::entities,
    crate::{
        api::RestError,
        kernel::{
            db::DB,
            entities::{
                AuctionId,
                BidId,
                CarId,
                UserId,
            },
        },
    },
    async_trait::async_trait,
    bigdecimal::BigDecimal,
    sqlx::FromRow,
    std::{
        collections::HashMap,
        fmt::Debug,
    },
    time::OffsetDateTime,
    tracing::instrument,
};

#[derive(Clone, Copy, Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "lowercase")]
pub enum AuctionStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl From<entities::AuctionStatus> for AuctionStatus {
    fn from(status: entities::AuctionStatus) -> Self {
        match status {
            entities::AuctionStatus::Pending => AuctionStatus::Pending,
            entities::AuctionStatus::Active => AuctionStatus::Active,
            entities::AuctionStatus::Completed => AuctionStatus::Completed,
            entities::AuctionStatus::Cancelled => AuctionStatus::Cancelled,
        }
    }
}

impl From<AuctionStatus> for entities::AuctionStatus {
    fn from(status: AuctionStatus) -> Self {
        match status {
            AuctionStatus::Pending => entities::AuctionStatus::Pending,
            AuctionStatus::Active => entities::AuctionStatus::Active,
            AuctionStatus::Completed => entities::AuctionStatus::Completed,
            AuctionStatus::Cancelled => entities::AuctionStatus::Cancelled,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct Auction {
    pub id:                          AuctionId,
    pub car_id:                      CarId,
    pub starting_price:              BigDecimal,
    pub reserve_price:               Option<BigDecimal>,
    pub minimum_bid_increment:       BigDecimal,
    pub current_bid:                 BigDecimal,
    pub current_bidder_id:           Option<UserId>,
    pub start_time:                  OffsetDateTime,
    pub end_time:                    OffsetDateTime,
    pub original_end_time:           OffsetDateTime,
    pub extension_minutes:           i64,
    pub extension_threshold_minutes: i64,
    pub total_bids:                  i32,
    pub status:                      AuctionStatus,
    pub created_at:                  OffsetDateTime,
}

impl From<&entities::Auction> for Auction {
    fn from(auction: &entities::Auction) -> Self {
        Self {
            id:                          auction.id,
            car_id:                      auction.car_id,
            starting_price:              auction.starting_price.clone(),
            reserve_price:               auction.reserve_price.clone(),
            minimum_bid_increment:       auction.minimum_bid_increment.clone(),
            current_bid:                 auction.current_bid.clone(),
            current_bidder_id:           auction.current_bidder_id,
            start_time:                  auction.start_time,
            end_time:                    auction.end_time,
            original_end_time:           auction.original_end_time,
            extension_minutes:           auction.extension_minutes,
            extension_threshold_minutes: auction.extension_threshold_minutes,
            total_bids:                  auction.total_bids,
            status:                      auction.status.into(),
            created_at:                  auction.created_at,
        }
    }
}

impl Auction {
    pub fn get_entity(&self) -> entities::Auction {
        entities::Auction {
            id:                          self.id,
            car_id:                      self.car_id,
            starting_price:              self.starting_price.clone(),
            reserve_price:               self.reserve_price.clone(),
            minimum_bid_increment:       self.minimum_bid_increment.clone(),
            current_bid:                 self.current_bid.clone(),
            current_bidder_id:           self.current_bidder_id,
            start_time:                  self.start_time,
            end_time:                    self.end_time,
            original_end_time:           self.original_end_time,
            extension_minutes:           self.extension_minutes,
            extension_threshold_minutes: self.extension_threshold_minutes,
            total_bids:                  self.total_bids,
            status:                      self.status.into(),
            created_at:                  self.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct Bid {
    pub id:             BidId,
    pub auction_id:     AuctionId,
    pub bidder_id:      UserId,
    pub amount:         BigDecimal,
    pub is_winning_bid: bool,
    pub placed_at:      OffsetDateTime,
    pub ip_address:     Option<String>,
}

impl From<&entities::Bid> for Bid {
    fn from(bid: &entities::Bid) -> Self {
        Self {
            id:             bid.id,
            auction_id:     bid.auction_id,
            bidder_id:      bid.bidder_id,
            amount:         bid.amount.clone(),
            is_winning_bid: bid.is_winning_bid,
            placed_at:      bid.placed_at,
            ip_address:     bid.ip_address.clone(),
        }
    }
}

impl Bid {
    pub fn get_entity(&self) -> entities::Bid {
        entities::Bid {
            id:             self.id,
            auction_id:     self.auction_id,
            bidder_id:      self.bidder_id,
            amount:         self.amount.clone(),
            is_winning_bid: self.is_winning_bid,
            placed_at:      self.placed_at,
            ip_address:     self.ip_address.clone(),
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct AuctionHistory {
    pub auction_id:          AuctionId,
    pub winner_id:           Option<UserId>,
    pub final_price:         BigDecimal,
    pub total_bids:          i32,
    pub unique_participants: i32,
    pub completed_at:        OffsetDateTime,
    pub reserve_met:         bool,
}

impl AuctionHistory {
    pub fn get_entity(&self) -> entities::AuctionHistory {
        entities::AuctionHistory {
            auction_id:          self.auction_id,
            winner_id:           self.winner_id,
            final_price:         self.final_price.clone(),
            total_bids:          self.total_bids,
            unique_participants: self.unique_participants,
            completed_at:        self.completed_at,
            reserve_met:         self.reserve_met,
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database: Debug + Send + Sync + 'static {
    async fn add_auction(&self, auction: &entities::Auction) -> Result<(), RestError>;
    /// Persists an accepted bid and the auction snapshot it produced as one
    /// transaction.
    async fn add_bid(
        &self,
        bid: &entities::Bid,
        auction: &entities::Auction,
    ) -> Result<(), RestError>;
    async fn update_auction(&self, auction: &entities::Auction) -> Result<(), RestError>;
    /// Flips the auction to completed, writes its history record, and marks
    /// the winning bid, all in one transaction guarded on the auction still
    /// being active.
    async fn conclude_auction(
        &self,
        auction: &entities::Auction,
        history: &entities::AuctionHistory,
        winning_bid: Option<BidId>,
    ) -> Result<(), RestError>;
    async fn get_auction(&self, auction_id: AuctionId) -> Result<Option<Auction>, RestError>;
    async fn get_bids(&self, auction_id: AuctionId) -> Result<Vec<Bid>, RestError>;
    async fn get_winning_bid(&self, auction_id: AuctionId) -> Result<Option<Bid>, RestError>;
    async fn get_history(
        &self,
        auction_id: AuctionId,
    ) -> Result<Option<AuctionHistory>, RestError>;
    async fn load_open_auctions(&self) -> Result<Vec<(Auction, Vec<Bid>)>, RestError>;
    async fn get_id_watermarks(&self) -> Result<(AuctionId, BidId), RestError>;
}

#[async_trait]
impl Database for DB {
    #[instrument(
        target = "metrics",
        name = "db_add_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "add_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn add_auction(&self, auction: &entities::Auction) -> Result<(), RestError> {
        let row = Auction::from(auction);
        sqlx::query(
            "INSERT INTO auction (id, car_id, starting_price, reserve_price, \
             minimum_bid_increment, current_bid, current_bidder_id, start_time, end_time, \
             original_end_time, extension_minutes, extension_threshold_minutes, total_bids, \
             status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(row.id)
        .bind(row.car_id)
        .bind(&row.starting_price)
        .bind(&row.reserve_price)
        .bind(&row.minimum_bid_increment)
        .bind(&row.current_bid)
        .bind(row.current_bidder_id)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(row.original_end_time)
        .bind(row.extension_minutes)
        .bind(row.extension_threshold_minutes)
        .bind(row.total_bids)
        .bind(row.status)
        .bind(row.created_at)
        .execute(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), auction = ?row, "DB: Failed to insert auction");
            RestError::TemporarilyUnavailable
        })?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_add_bid",
        fields(
            category = "db_queries",
            result = "success",
            name = "add_bid",
            tracing_enabled
        ),
        skip_all
    )]
    async fn add_bid(
        &self,
        bid: &entities::Bid,
        auction: &entities::Auction,
    ) -> Result<(), RestError> {
        let bid_row = Bid::from(bid);
        let auction_row = Auction::from(auction);
        let map_err = |e: sqlx::Error| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), bid = ?bid_row, "DB: Failed to insert bid");
            RestError::TemporarilyUnavailable
        };

        let mut tx = self.begin().await.map_err(map_err)?;
        sqlx::query(
            "INSERT INTO bid (id, auction_id, bidder_id, amount, is_winning_bid, placed_at, \
             ip_address) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(bid_row.id)
        .bind(bid_row.auction_id)
        .bind(bid_row.bidder_id)
        .bind(&bid_row.amount)
        .bind(bid_row.is_winning_bid)
        .bind(bid_row.placed_at)
        .bind(&bid_row.ip_address)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        sqlx::query(
            "UPDATE auction SET current_bid = $1, current_bidder_id = $2, total_bids = $3, \
             end_time = $4 WHERE id = $5",
        )
        .bind(&auction_row.current_bid)
        .bind(auction_row.current_bidder_id)
        .bind(auction_row.total_bids)
        .bind(auction_row.end_time)
        .bind(auction_row.id)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_update_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "update_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn update_auction(&self, auction: &entities::Auction) -> Result<(), RestError> {
        let row = Auction::from(auction);
        sqlx::query(
            "UPDATE auction SET starting_price = $1, reserve_price = $2, \
             minimum_bid_increment = $3, current_bid = $4, start_time = $5, end_time = $6, \
             original_end_time = $7, extension_minutes = $8, extension_threshold_minutes = $9, \
             status = $10 WHERE id = $11",
        )
        .bind(&row.starting_price)
        .bind(&row.reserve_price)
        .bind(&row.minimum_bid_increment)
        .bind(&row.current_bid)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(row.original_end_time)
        .bind(row.extension_minutes)
        .bind(row.extension_threshold_minutes)
        .bind(row.status)
        .bind(row.id)
        .execute(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), auction = ?row, "DB: Failed to update auction");
            RestError::TemporarilyUnavailable
        })?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_conclude_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "conclude_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn conclude_auction(
        &self,
        auction: &entities::Auction,
        history: &entities::AuctionHistory,
        winning_bid: Option<BidId>,
    ) -> Result<(), RestError> {
        let map_err = |e: sqlx::Error| {
            tracing::Span::current().record("result", "error");
            tracing::error!(
                error = e.to_string(),
                auction_id = auction.id,
                "DB: Failed to conclude auction"
            );
            RestError::TemporarilyUnavailable
        };

        let mut tx = self.begin().await.map_err(map_err)?;
        let result = sqlx::query(
            "UPDATE auction SET status = $1 WHERE id = $2 AND status = $3",
        )
        .bind(AuctionStatus::Completed)
        .bind(auction.id)
        .bind(AuctionStatus::Active)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        if result.rows_affected() == 0 {
            // Someone else completed this auction first; the history record
            // they wrote stands.
            tx.rollback().await.map_err(map_err)?;
            tracing::warn!(auction_id = auction.id, "Auction was already concluded");
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO auction_history (auction_id, winner_id, final_price, total_bids, \
             unique_participants, completed_at, reserve_met) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(history.auction_id)
        .bind(history.winner_id)
        .bind(&history.final_price)
        .bind(history.total_bids)
        .bind(history.unique_participants)
        .bind(history.completed_at)
        .bind(history.reserve_met)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        if let Some(winning_bid) = winning_bid {
            sqlx::query("UPDATE bid SET is_winning_bid = TRUE WHERE id = $1")
                .bind(winning_bid)
                .execute(&mut *tx)
                .await
                .map_err(map_err)?;
        }
        tx.commit().await.map_err(map_err)?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_get_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_auction(&self, auction_id: AuctionId) -> Result<Option<Auction>, RestError> {
        sqlx::query_as("SELECT * FROM auction WHERE id = $1")
            .bind(auction_id)
            .fetch_optional(self)
            .await
            .map_err(|e| {
                tracing::Span::current().record("result", "error");
                tracing::error!(error = e.to_string(), auction_id, "Failed to get auction from db");
                RestError::TemporarilyUnavailable
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_bids",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_bids",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_bids(&self, auction_id: AuctionId) -> Result<Vec<Bid>, RestError> {
        sqlx::query_as("SELECT * FROM bid WHERE auction_id = $1 ORDER BY placed_at ASC")
            .bind(auction_id)
            .fetch_all(self)
            .await
            .map_err(|e| {
                tracing::Span::current().record("result", "error");
                tracing::error!(error = e.to_string(), auction_id, "DB: Failed to fetch bids");
                RestError::TemporarilyUnavailable
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_winning_bid",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_winning_bid",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_winning_bid(&self, auction_id: AuctionId) -> Result<Option<Bid>, RestError> {
        sqlx::query_as("SELECT * FROM bid WHERE auction_id = $1 AND is_winning_bid")
            .bind(auction_id)
            .fetch_optional(self)
            .await
            .map_err(|e| {
                tracing::Span::current().record("result", "error");
                tracing::error!(error = e.to_string(), auction_id, "DB: Failed to fetch winning bid");
                RestError::TemporarilyUnavailable
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_history",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_history",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_history(
        &self,
        auction_id: AuctionId,
    ) -> Result<Option<AuctionHistory>, RestError> {
        sqlx::query_as("SELECT * FROM auction_history WHERE auction_id = $1")
            .bind(auction_id)
            .fetch_optional(self)
            .await
            .map_err(|e| {
                tracing::Span::current().record("result", "error");
                tracing::error!(error = e.to_string(), auction_id, "DB: Failed to fetch history");
                RestError::TemporarilyUnavailable
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_load_open_auctions",
        fields(
            category = "db_queries",
            result = "success",
            name = "load_open_auctions",
            tracing_enabled
        ),
        skip_all
    )]
    async fn load_open_auctions(&self) -> Result<Vec<(Auction, Vec<Bid>)>, RestError> {
        let map_err = |e: sqlx::Error| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), "DB: Failed to load open auctions");
            RestError::TemporarilyUnavailable
        };

        let auctions: Vec<Auction> =
            sqlx::query_as("SELECT * FROM auction WHERE status IN ('pending', 'active')")
                .fetch_all(self)
                .await
                .map_err(map_err)?;
        let auction_ids: Vec<AuctionId> = auctions.iter().map(|auction| auction.id).collect();
        let bids: Vec<Bid> = sqlx::query_as(
            "SELECT * FROM bid WHERE auction_id = ANY($1) ORDER BY placed_at ASC",
        )
        .bind(&auction_ids)
        .fetch_all(self)
        .await
        .map_err(map_err)?;

        let mut by_auction: HashMap<AuctionId, Vec<Bid>> = HashMap::new();
        for bid in bids {
            by_auction.entry(bid.auction_id).or_default().push(bid);
        }
        Ok(auctions
            .into_iter()
            .map(|auction| {
                let bids = by_auction.remove(&auction.id).unwrap_or_default();
                (auction, bids)
            })
            .collect())
    }

    #[instrument(
        target = "metrics",
        name = "db_get_id_watermarks",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_id_watermarks",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_id_watermarks(&self) -> Result<(AuctionId, BidId), RestError> {
        sqlx::query_as(
            "SELECT COALESCE((SELECT MAX(id) FROM auction), 0), \
             COALESCE((SELECT MAX(id) FROM bid), 0)",
        )
        .fetch_one(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), "DB: Failed to fetch id watermarks");
            RestError::TemporarilyUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        time::Duration,
    };

    #[test]
    fn auction_rows_round_trip() {
        let end_time = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        let auction = entities::Auction {
            id:                          3,
            car_id:                      8,
            starting_price:              BigDecimal::from(10_000),
            reserve_price:               Some(BigDecimal::from(12_000)),
            minimum_bid_increment:       BigDecimal::from(100),
            current_bid:                 BigDecimal::from(10_500),
            current_bidder_id:           Some(21),
            start_time:                  end_time - Duration::days(7),
            end_time,
            original_end_time:           end_time,
            extension_minutes:           5,
            extension_threshold_minutes: 2,
            total_bids:                  5,
            status:                      entities::AuctionStatus::Active,
            created_at:                  end_time - Duration::days(7),
        };
        assert_eq!(Auction::from(&auction).get_entity(), auction);
    }

    #[test]
    fn bid_rows_round_trip() {
        let bid = entities::Bid {
            id:             17,
            auction_id:     3,
            bidder_id:      21,
            amount:         BigDecimal::from(10_500),
            is_winning_bid: true,
            placed_at:      OffsetDateTime::UNIX_EPOCH + Duration::days(20_000),
            ip_address:     Some("203.0.113.9".to_string()),
        };
        assert_eq!(Bid::from(&bid).get_entity(), bid);
    }
}
