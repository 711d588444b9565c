use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

pub struct GetBidsInput {
    pub auction_id: AuctionId,
}

impl Service {
    /// The auction's bids, highest first.
    pub async fn get_bids(&self, input: GetBidsInput) -> Result<Vec<entities::Bid>, RestError> {
        self.repo
            .get_auction_with_fallback(input.auction_id)
            .await?
            .ok_or(RestError::AuctionNotFound(input.auction_id))?;
        let mut bids = self.repo.get_bids_with_fallback(input.auction_id).await?;
        bids.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(bids)
    }
}
