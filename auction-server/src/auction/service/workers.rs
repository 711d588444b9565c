use {
    super::Service,
    crate::server::{
        EXIT_CHECK_INTERVAL,
        SHOULD_EXIT,
    },
    std::sync::atomic::Ordering,
};

impl Service {
    /// Drives the periodic sweep until shutdown. Each tick activates due
    /// pending auctions, closes expired ones and announces auctions ending
    /// soon; the passes log their own per-auction failures and the schedule
    /// survives them, so an auction missed by one tick is simply caught by
    /// the next.
    pub async fn run_sweeper_loop(&self) {
        tracing::info!(
            interval = ?self.config.sweep_interval,
            "Starting auction sweeper...",
        );
        let mut sweep_interval = tokio::time::interval(self.config.sweep_interval);
        let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
        while !SHOULD_EXIT.load(Ordering::Acquire) {
            tokio::select! {
                _ = sweep_interval.tick() => {
                    self.activate_pending_auctions().await;
                    self.close_expired_auctions().await;
                    self.notify_ending_soon().await;
                }
                _ = exit_check_interval.tick() => {}
            }
        }
        tracing::info!("Shutting down auction sweeper...");
    }
}
