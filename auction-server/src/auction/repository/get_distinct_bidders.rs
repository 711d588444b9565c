use {
    super::Repository,
    crate::kernel::entities::{
        AuctionId,
        UserId,
    },
};

impl Repository {
    /// Every user who placed at least one bid on this auction, each once.
    pub fn get_distinct_bidders(&self, auction_id: AuctionId) -> Vec<UserId> {
        let mut bidders: Vec<UserId> = self
            .get_bids(auction_id)
            .iter()
            .map(|bid| bid.bidder_id)
            .collect();
        bidders.sort_unstable();
        bidders.dedup();
        bidders
    }
}
