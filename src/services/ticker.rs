// License: MIT

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::time::sleep;

use crate::core::events::Event;
use crate::core::monitor_msg::MonitorMsg;
use crate::core::utils::now_ms;

/// Repeating poll timer. Emits the first tick immediately, so starting the
/// monitor performs a check without waiting out the first interval.
pub async fn run_poll_ticker(tx: Sender<MonitorMsg>, interval: Duration) {
    tracing::info!("poll ticker started ({}ms interval)", interval.as_millis());

    loop {
        // If the daemon is gone, stop.
        if tx
            .send(MonitorMsg::Event(Event::Tick { now_ms: now_ms() }))
            .await
            .is_err()
        {
            tracing::warn!("poll ticker stopping (receiver dropped)");
            break;
        }

        sleep(interval).await;
    }
}
