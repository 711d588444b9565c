use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    pub fn get_bids(&self, auction_id: AuctionId) -> Vec<entities::Bid> {
        self.in_memory_store
            .bids
            .get(&auction_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// The working set is authoritative while the auction is open; afterwards
    /// the bids only exist in the database.
    pub async fn get_bids_with_fallback(
        &self,
        auction_id: AuctionId,
    ) -> Result<Vec<entities::Bid>, RestError> {
        if self.in_memory_store.auctions.contains_key(&auction_id) {
            return Ok(self.get_bids(auction_id));
        }
        Ok(self
            .db
            .get_bids(auction_id)
            .await?
            .iter()
            .map(|row| row.get_entity())
            .collect())
    }
}
