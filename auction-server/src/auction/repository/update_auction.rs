use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
    },
};

impl Repository {
    /// Persists a changed auction and replaces its working-set snapshot.
    /// Callers must hold the auction's lock.
    pub async fn update_auction(
        &self,
        auction: entities::Auction,
    ) -> Result<entities::Auction, RestError> {
        self.db.update_auction(&auction).await?;

        self.in_memory_store
            .auctions
            .insert(auction.id, auction.clone());
        Ok(auction)
    }
}
