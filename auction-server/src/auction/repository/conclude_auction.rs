use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::BidId,
    },
};

impl Repository {
    /// Persists the close (status flip, history record, winning-bid flag) as
    /// one transaction and evicts the auction from the working set. Callers
    /// must hold the auction's lock.
    #[tracing::instrument(skip_all, fields(auction_id = auction.id))]
    pub async fn conclude_auction(
        &self,
        auction: entities::Auction,
        history: entities::AuctionHistory,
        winning_bid: Option<BidId>,
    ) -> Result<(), RestError> {
        self.db
            .conclude_auction(&auction, &history, winning_bid)
            .await?;

        self.in_memory_store.auctions.remove(&auction.id);
        self.in_memory_store.bids.remove(&auction.id);
        Ok(())
    }
}
