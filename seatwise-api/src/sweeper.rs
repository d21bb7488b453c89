use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::info;
use crate::sessions::SessionStore;

/// Periodically discard selection sessions nobody has touched within `ttl`.
/// Abandoned screens leave nothing behind, so dropping them is enough.
pub fn start_selection_sweeper(
    sessions: Arc<SessionStore>,
    ttl: chrono::Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        info!("Selection sweeper started, ttl {}s", ttl.num_seconds());

        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired(ttl).await;
            if removed > 0 {
                info!("Expired {} idle seat selections", removed);
            }
        }
    })
}
