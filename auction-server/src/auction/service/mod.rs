use {
    super::repository::{
        Database,
        Repository,
    },
    crate::{
        api::RestError,
        notification::NotificationSink,
    },
    car_auction_api_types::ws::UpdateEvent,
    std::sync::Arc,
    tokio::sync::broadcast,
    tokio_util::task::TaskTracker,
};

pub mod activate_pending_auctions;
pub mod cancel_auction;
pub mod close_expired_auctions;
pub mod conclude_auction;
pub mod create_auction;
pub mod get_auction;
pub mod get_auction_history;
pub mod get_bids;
pub mod get_winning_bid;
pub mod notify_ending_soon;
pub mod place_bid;
pub mod update_auction;
pub mod verification;
pub mod workers;

pub struct Config {
    /// How often the sweeper ticks.
    pub sweep_interval:     std::time::Duration,
    /// Auctions ending within this window get "ending soon" notifications.
    pub ending_soon_window: time::Duration,
}

pub struct ServiceInner {
    config:       Config,
    repo:         Arc<Repository>,
    notifier:     Arc<dyn NotificationSink>,
    task_tracker: TaskTracker,
    event_sender: broadcast::Sender<UpdateEvent>,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(
        config: Config,
        db: impl Database,
        notifier: Arc<dyn NotificationSink>,
        task_tracker: TaskTracker,
        event_sender: broadcast::Sender<UpdateEvent>,
    ) -> Self {
        Self(Arc::new(ServiceInner {
            config,
            repo: Arc::new(Repository::new(db)),
            notifier,
            task_tracker,
            event_sender,
        }))
    }

    /// Restores the working set from the database; called once at startup.
    pub async fn hydrate(&self) -> Result<usize, RestError> {
        self.repo.hydrate().await
    }

    /// Live updates are best-effort: with no subscriber connected the send
    /// fails, which is not the caller's problem.
    fn broadcast(&self, update: UpdateEvent) {
        if let Err(err) = self.event_sender.send(update) {
            tracing::debug!(error = %err, "No live-update subscribers, dropping update");
        }
    }
}
