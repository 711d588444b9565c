use {
    super::Repository,
    crate::kernel::entities::CarId,
};

impl Repository {
    /// Open (pending or active) auctions all live in the working set, so the
    /// duplicate-auction check never needs the database. A partial unique
    /// index on the auction table backs this up.
    pub fn has_open_auction_for_car(&self, car_id: CarId) -> bool {
        self.in_memory_store
            .auctions
            .iter()
            .any(|entry| entry.value().car_id == car_id && entry.value().is_open())
    }
}
