use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct GetAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    pub async fn get_auction(&self, input: GetAuctionInput) -> Result<entities::Auction, RestError> {
        self.repo
            .get_auction_with_fallback(input.auction_id)
            .await?
            .ok_or(RestError::AuctionNotFound(input.auction_id))
    }
}
