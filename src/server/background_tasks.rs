//! Background task startup functions

use gsurv_core::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Start the periodic idle-session sweep
pub fn start_session_cleanup(
    registry: Arc<SessionRegistry>,
    interval_secs: u64,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));
    info!("Session cleanup every {}s", period.as_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Session cleanup stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = registry.cleanup_expired().await;
                    debug!(removed, "Session cleanup pass");
                }
            }
        }
    })
}
