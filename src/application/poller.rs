// Periodic refetch of the upstream sensor data
use crate::application::dashboard_service::{DashboardService, RefreshOutcome};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Refresh the dashboard snapshot every `interval_secs`, starting immediately.
///
/// Failures keep the previous snapshot; the next tick tries again.
pub async fn run_polling(service: DashboardService, interval_secs: u64) {
    tracing::info!(interval_secs, "Starting sensor data poller");

    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match service.refresh().await {
            Ok(RefreshOutcome::Applied { records }) => {
                tracing::debug!(records, "Poll completed");
            }
            Ok(RefreshOutcome::Stale) => {
                tracing::debug!("Poll superseded by a newer refresh");
            }
            Err(e) => {
                tracing::error!(error = %e, "Poll failed, keeping previous snapshot");
            }
        }
    }
}
