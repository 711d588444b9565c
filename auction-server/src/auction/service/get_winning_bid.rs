use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct GetWinningBidInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// The bid that won a completed auction, if the auction is closed and had
    /// a winner.
    pub async fn get_winning_bid(
        &self,
        input: GetWinningBidInput,
    ) -> Result<Option<entities::Bid>, RestError> {
        self.repo.get_winning_bid(input.auction_id).await
    }
}
