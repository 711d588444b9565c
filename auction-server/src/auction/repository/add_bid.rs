use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
    },
};

impl Repository {
    /// Persists an accepted bid together with the auction snapshot it
    /// produced. Callers must hold the auction's lock; the database commit
    /// lands before the working set is replaced.
    pub async fn add_bid(
        &self,
        bid: entities::Bid,
        auction: entities::Auction,
    ) -> Result<(), RestError> {
        self.db.add_bid(&bid, &auction).await?;

        self.in_memory_store
            .bids
            .entry(bid.auction_id)
            .or_default()
            .push(bid);
        self.in_memory_store.auctions.insert(auction.id, auction);
        Ok(())
    }
}
