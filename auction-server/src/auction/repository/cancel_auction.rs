use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
    },
};

impl Repository {
    /// Marks the auction cancelled and evicts it and its bids from the
    /// working set; from here on only the database knows it. Callers must
    /// hold the auction's lock.
    pub async fn cancel_auction(&self, auction: entities::Auction) -> Result<(), RestError> {
        self.db.update_auction(&auction).await?;

        self.in_memory_store.auctions.remove(&auction.id);
        self.in_memory_store.bids.remove(&auction.id);
        Ok(())
    }
}
