use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
        kernel::entities::AuctionId,
    },
};

impl Repository {
    pub async fn get_history(
        &self,
        auction_id: AuctionId,
    ) -> Result<Option<entities::AuctionHistory>, RestError> {
        Ok(self
            .db
            .get_history(auction_id)
            .await?
            .map(|row| row.get_entity()))
    }
}
