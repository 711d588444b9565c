use {
    super::Repository,
    crate::auction::entities,
    time::OffsetDateTime,
};

impl Repository {
    /// Pending auctions whose start time has arrived.
    pub fn get_pending_auctions_due(&self, now: OffsetDateTime) -> Vec<entities::Auction> {
        self.in_memory_store
            .auctions
            .iter()
            .filter(|entry| {
                entry.value().status == entities::AuctionStatus::Pending
                    && entry.value().start_time <= now
            })
            .map(|entry| entry.value().clone())
            .collect()
    }
}
