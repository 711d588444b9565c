use {
    super::Repository,
    crate::auction::entities,
    time::OffsetDateTime,
};

impl Repository {
    /// Active auctions whose deadline has passed, longest-expired first.
    pub fn get_expired_auctions(&self, now: OffsetDateTime) -> Vec<entities::Auction> {
        let mut expired: Vec<entities::Auction> = self
            .in_memory_store
            .auctions
            .iter()
            .filter(|entry| {
                entry.value().status == entities::AuctionStatus::Active
                    && entry.value().has_ended(now)
            })
            .map(|entry| entry.value().clone())
            .collect();
        expired.sort_by_key(|auction| auction.end_time);
        expired
    }
}
