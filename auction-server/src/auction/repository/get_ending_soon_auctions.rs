use {
    super::Repository,
    crate::auction::entities,
    time::{
        Duration,
        OffsetDateTime,
    },
};

impl Repository {
    /// Active auctions whose deadline falls inside `(now, now + window]`.
    pub fn get_ending_soon_auctions(
        &self,
        now: OffsetDateTime,
        window: Duration,
    ) -> Vec<entities::Auction> {
        let threshold = now + window;
        let mut ending: Vec<entities::Auction> = self
            .in_memory_store
            .auctions
            .iter()
            .filter(|entry| {
                let auction = entry.value();
                auction.status == entities::AuctionStatus::Active
                    && now < auction.end_time
                    && auction.end_time <= threshold
            })
            .map(|entry| entry.value().clone())
            .collect();
        ending.sort_by_key(|auction| auction.end_time);
        ending
    }
}
