use {
    crate::{
        auction::service::{
            self,
            Service,
        },
        config::{
            Config,
            RunOptions,
        },
        kernel::db::DB,
        notification::LogSink,
    },
    anyhow::anyhow,
    car_auction_api_types::ws::UpdateEvent,
    futures::future::join_all,
    std::{
        sync::{
            atomic::{
                AtomicBool,
                Ordering,
            },
            Arc,
        },
        time::Duration,
    },
    tokio::sync::broadcast,
    tokio_util::task::TaskTracker,
};

pub async fn start_server(run_options: RunOptions) -> anyhow::Result<()> {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        tokio::signal::ctrl_c().await.unwrap();
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });

    let config = Config::load(&run_options.config.config).map_err(|err| {
        anyhow!(
            "Failed to load config from file({path}): {:?}",
            err,
            path = run_options.config.config
        )
    })?;

    let db = DB::connect(&run_options.server.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let task_tracker = TaskTracker::new();
    let (event_sender, event_receiver) = broadcast::channel(config.event_channel_capacity);

    let service = Service::new(
        service::Config {
            sweep_interval:     config.sweep_interval,
            ending_soon_window: time::Duration::try_from(config.ending_soon_window)?,
        },
        db,
        Arc::new(LogSink),
        task_tracker.clone(),
        event_sender,
    );

    let restored = service.hydrate().await?;
    tracing::info!(auctions = restored, "Restored open auctions from the database");

    let sweeper_loop = tokio::spawn({
        let service = service.clone();
        async move { service.run_sweeper_loop().await }
    });
    let event_logger_loop = tokio::spawn(run_event_logger(event_receiver));
    join_all(vec![sweeper_loop, event_logger_loop]).await;

    task_tracker.close();
    task_tracker.wait().await;
    tracing::info!("Shut down complete");
    Ok(())
}

/// Stand-in for the live-update transport: drains the broadcast channel and
/// traces the updates so they stay observable without a connected client.
async fn run_event_logger(mut event_receiver: broadcast::Receiver<UpdateEvent>) {
    let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
    while !SHOULD_EXIT.load(Ordering::Acquire) {
        tokio::select! {
            update = event_receiver.recv() => {
                match update {
                    Ok(update) => tracing::debug!(update = ?update, "Live update"),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed = missed, "Live update logger lagged behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = exit_check_interval.tick() => {}
        }
    }
    tracing::info!("Shutting down live update logger...");
}

// A static exit flag to indicate to running threads that we're shutting down. This is used to
// gracefully shutdown the application.
//
// NOTE: A more idiomatic approach would be to use a tokio::sync::broadcast channel, and to send a
// shutdown signal to all running tasks. However, this is a bit more complicated to implement and
// we don't rely on global state for anything else.
pub(crate) static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);
