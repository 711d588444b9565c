use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct GetAuctionHistoryInput {
    pub auction_id: AuctionId,
}

impl Service {
    pub async fn get_auction_history(
        &self,
        input: GetAuctionHistoryInput,
    ) -> Result<Option<entities::AuctionHistory>, RestError> {
        self.repo.get_history(input.auction_id).await
    }
}
