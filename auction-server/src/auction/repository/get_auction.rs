use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    pub fn get_auction(&self, auction_id: AuctionId) -> Option<entities::Auction> {
        self.in_memory_store
            .auctions
            .get(&auction_id)
            .map(|entry| entry.value().clone())
    }

    /// Falls back to the database for auctions no longer held in memory
    /// (terminal ones).
    pub async fn get_auction_with_fallback(
        &self,
        auction_id: AuctionId,
    ) -> Result<Option<entities::Auction>, RestError> {
        if let Some(auction) = self.get_auction(auction_id) {
            return Ok(Some(auction));
        }
        Ok(self
            .db
            .get_auction(auction_id)
            .await?
            .map(|row| row.get_entity()))
    }
}
