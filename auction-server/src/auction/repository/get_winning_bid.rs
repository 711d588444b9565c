use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    /// The winning flag is only ever set by the close, so this is purely a
    /// database read.
    pub async fn get_winning_bid(
        &self,
        auction_id: AuctionId,
    ) -> Result<Option<entities::Bid>, RestError> {
        Ok(self
            .db
            .get_winning_bid(auction_id)
            .await?
            .map(|row| row.get_entity()))
    }
}
