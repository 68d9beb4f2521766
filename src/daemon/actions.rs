// License: MIT

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::core::{action::Action, events::Event, monitor_msg::MonitorMsg, utils::now_ms};
use crate::session::probe::SessionProbe;
use crate::surface::{LockdownSurface, NavigateMethod};

use super::Daemon;

impl<P: SessionProbe + 'static> Daemon<P> {
    pub(super) async fn exec_action(&mut self, action: Action, tx: &mpsc::Sender<MonitorMsg>) {
        match action {
            Action::CheckLiveness => {
                self.spawn_check(tx.clone());
            }

            Action::ScheduleRetry { delay_ms } => {
                tracing::debug!(delay_ms, "scheduling fallback re-check");
                spawn_retry(tx.clone(), Duration::from_millis(delay_ms));
            }

            Action::StopPolling => {
                self.stop_polling();
            }

            Action::BeginLockdown {
                message,
                countdown_seconds,
            } => {
                self.surface.show_lockdown(&message, countdown_seconds);
                self.surface.disable_interaction();
                self.surface.block_navigation();

                self.start_countdown(tx.clone(), countdown_seconds);
            }

            Action::UpdateCountdown { remaining } => {
                self.surface.update_countdown(remaining);
            }

            Action::Redirect { target } => {
                self.abort_countdown();

                let delay =
                    Duration::from_millis(self.monitor.cfg().redirect.fallback_delay_ms);
                run_redirect_chain(self.surface.as_mut(), &target, delay).await;
            }
        }
    }

    /// Fire one liveness query without blocking the event loop. Several
    /// checks may be in flight at once; the engine's phase guard makes the
    /// duplicated results harmless.
    fn spawn_check(&self, tx: mpsc::Sender<MonitorMsg>) {
        let probe = Arc::clone(&self.probe);

        tokio::spawn(async move {
            let verdict = probe.check().await;
            let _ = tx
                .send(MonitorMsg::Event(Event::PollCompleted {
                    verdict,
                    now_ms: now_ms(),
                }))
                .await;
        });
    }

    fn start_countdown(&mut self, tx: mpsc::Sender<MonitorMsg>, seconds: u32) {
        self.abort_countdown();
        self.countdown_handle = Some(spawn_countdown(tx, seconds));
    }

    pub(super) fn abort_countdown(&mut self) {
        if let Some(handle) = self.countdown_handle.take() {
            handle.abort();
        }
    }
}

fn spawn_retry(tx: mpsc::Sender<MonitorMsg>, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(delay).await;
        let _ = tx
            .send(MonitorMsg::Event(Event::RetryDue { now_ms: now_ms() }))
            .await;
    })
}

/// One `CountdownTick` per second, `seconds` in total. The engine turns
/// the final tick into the redirect.
fn spawn_countdown(tx: mpsc::Sender<MonitorMsg>, seconds: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        for _ in 0..seconds {
            sleep(Duration::from_secs(1)).await;
            if tx
                .send(MonitorMsg::Event(Event::CountdownTick { now_ms: now_ms() }))
                .await
                .is_err()
            {
                break;
            }
        }
    })
}

/// Layered best-effort navigation: a primary assignment, a replacement
/// fallback shortly after, and a final forced reload. The chain is short
/// enough to run inline; nothing else matters once the redirect starts.
pub(super) async fn run_redirect_chain(
    surface: &mut dyn LockdownSurface,
    target: &str,
    fallback_delay: Duration,
) {
    surface.navigate(target, NavigateMethod::Assign);
    sleep(fallback_delay).await;
    surface.navigate(target, NavigateMethod::Replace);
    sleep(fallback_delay).await;
    surface.navigate(target, NavigateMethod::ForceReload);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl LockdownSurface for RecordingSurface {
        fn show_lockdown(&mut self, message: &str, countdown_seconds: u32) {
            self.calls.push(format!("show:{message}:{countdown_seconds}"));
        }
        fn update_countdown(&mut self, remaining: u32) {
            self.calls.push(format!("countdown:{remaining}"));
        }
        fn disable_interaction(&mut self) {
            self.calls.push("disable".to_string());
        }
        fn block_navigation(&mut self) {
            self.calls.push("block-nav".to_string());
        }
        fn navigate(&mut self, target: &str, method: NavigateMethod) {
            self.calls.push(format!("navigate:{method}:{target}"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_chain_runs_all_three_methods_in_order() {
        let mut surface = RecordingSurface { calls: Vec::new() };

        run_redirect_chain(&mut surface, "/iniciosesion/", Duration::from_millis(100)).await;

        assert_eq!(
            surface.calls,
            vec![
                "navigate:assign:/iniciosesion/",
                "navigate:replace:/iniciosesion/",
                "navigate:force-reload:/iniciosesion/",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_task_emits_one_tick_per_second_then_stops() {
        let (tx, mut rx) = mpsc::channel::<MonitorMsg>(16);

        let handle = spawn_countdown(tx, 5);

        let mut ticks = 0;
        while let Some(msg) = rx.recv().await {
            assert!(matches!(
                msg,
                MonitorMsg::Event(Event::CountdownTick { .. })
            ));
            ticks += 1;
        }

        assert_eq!(ticks, 5);
        assert!(handle.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_task_fires_exactly_once() {
        let (tx, mut rx) = mpsc::channel::<MonitorMsg>(16);

        spawn_retry(tx, Duration::from_millis(5000));

        let first = rx.recv().await;
        assert!(matches!(
            first,
            Some(MonitorMsg::Event(Event::RetryDue { .. }))
        ));
        assert!(rx.recv().await.is_none());
    }
}
