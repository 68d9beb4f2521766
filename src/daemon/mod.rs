// License: MIT

mod actions;
mod run;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::model::MonitorConfig;
use crate::core::{
    info::InfoSnapshot,
    monitor::Monitor,
    monitor_msg::MonitorMsg,
    state::{MonitorState, Phase},
    utils::format_duration,
};
use crate::session::probe::SessionProbe;
use crate::surface::LockdownSurface;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub struct Daemon<P: SessionProbe + 'static> {
    monitor: Monitor,
    state: MonitorState,

    probe: Arc<P>,
    surface: Box<dyn LockdownSurface>,

    started_wall: DateTime<Local>,

    // The single repeating poll timer. `start_polling` aborts any previous
    // handle before installing a new one, so orphaned tickers cannot exist.
    poll_handle: Option<JoinHandle<()>>,
    countdown_handle: Option<JoinHandle<()>>,
}

impl<P: SessionProbe + 'static> Daemon<P> {
    pub fn new(
        cfg: MonitorConfig,
        now_ms: u64,
        probe: Arc<P>,
        surface: Box<dyn LockdownSurface>,
    ) -> Self {
        Self {
            monitor: Monitor::new(cfg),
            state: MonitorState::new(now_ms),
            probe,
            surface,
            started_wall: Local::now(),
            poll_handle: None,
            countdown_handle: None,
        }
    }

    /// (Re)start periodic polling. Idempotent: a previous ticker is
    /// cancelled first, and the new one performs an immediate check.
    pub fn start_polling(&mut self, tx: &mpsc::Sender<MonitorMsg>) {
        self.stop_polling();

        let interval = Duration::from_millis(self.monitor.cfg().session.poll_interval_ms);
        self.poll_handle = Some(tokio::spawn(crate::services::ticker::run_poll_ticker(
            tx.clone(),
            interval,
        )));
    }

    /// Cancel the repeating timer if present; no-op otherwise. Never
    /// touches the monitor phase.
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.poll_handle.take() {
            handle.abort();
        }
    }

    pub fn polling(&self) -> bool {
        self.poll_handle.is_some()
    }

    fn snapshot(&self, now_ms: u64) -> InfoSnapshot {
        let cfg = self.monitor.cfg();
        let elapsed = Duration::from_millis(self.state.elapsed_ms(now_ms));
        let in_grace = self
            .state
            .in_grace_period(now_ms, cfg.session.grace_period_ms);

        let phase = match self.state.phase() {
            Phase::Active => "active",
            Phase::Closed => "closed",
        };

        let destination = self.monitor.login_destination();
        let last_poll = self.state.last_poll().map(|p| p.label().to_string());

        let pretty_text = format!(
            "Vigia session monitor\n\
             \x20 Phase:        {}{}\n\
             \x20 Started:      {}\n\
             \x20 Elapsed:      {}\n\
             \x20 Polling:      {}\n\
             \x20 Checks:       {} requested, {} suppressed\n\
             \x20 Last poll:    {}\n\
             \x20 Page path:    {}\n\
             \x20 Login target: {}",
            phase,
            if in_grace { " (grace period)" } else { "" },
            self.started_wall.format("%Y-%m-%d %H:%M:%S"),
            format_duration(elapsed),
            if self.polling() { "yes" } else { "no" },
            self.state.checks_requested(),
            self.state.suppressed_results(),
            last_poll.as_deref().unwrap_or("none yet"),
            cfg.session.page_path,
            destination,
        );

        InfoSnapshot {
            phase: phase.to_string(),
            started_at: self.started_wall.format("%Y-%m-%d %H:%M:%S").to_string(),
            elapsed: format_duration(elapsed),
            in_grace_period: in_grace,
            polling: self.polling(),
            checks_requested: self.state.checks_requested(),
            suppressed_results: self.state.suppressed_results(),
            last_poll,
            countdown_remaining: self.state.countdown_remaining(),
            page_path: cfg.session.page_path.clone(),
            login_destination: destination,
            pretty_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::PollVerdict;
    use crate::surface::NavigateMethod;
    use std::future::Future;

    struct StubProbe;

    impl SessionProbe for StubProbe {
        fn check(&self) -> impl Future<Output = PollVerdict> + Send {
            async { PollVerdict::Active }
        }
    }

    struct NullSurface;

    impl LockdownSurface for NullSurface {
        fn show_lockdown(&mut self, _message: &str, _countdown_seconds: u32) {}
        fn update_countdown(&mut self, _remaining: u32) {}
        fn disable_interaction(&mut self) {}
        fn block_navigation(&mut self) {}
        fn navigate(&mut self, _target: &str, _method: NavigateMethod) {}
    }

    fn test_cfg(poll_interval_ms: u64) -> MonitorConfig {
        let mut cfg = MonitorConfig::default();
        cfg.session.status_url = "https://puntos.example.org/verificar-sesion/".to_string();
        cfg.session.poll_interval_ms = poll_interval_ms;
        cfg
    }

    fn test_daemon(poll_interval_ms: u64) -> Daemon<StubProbe> {
        Daemon::new(
            test_cfg(poll_interval_ms),
            0,
            Arc::new(StubProbe),
            Box::new(NullSurface),
        )
    }

    #[tokio::test]
    async fn restarting_polling_cancels_the_previous_ticker() {
        let (tx, mut rx) = mpsc::channel::<MonitorMsg>(64);
        let mut daemon = test_daemon(10_000);

        daemon.start_polling(&tx);
        let first = daemon.poll_handle.as_ref().unwrap().abort_handle();

        daemon.start_polling(&tx);

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(first.is_finished());
        assert!(daemon.polling());

        // Exactly one immediate tick per ticker start reaches the channel;
        // the aborted ticker contributes its first tick at most.
        let mut ticks = 0;
        while let Ok(msg) = rx.try_recv() {
            if matches!(msg, MonitorMsg::Event(_)) {
                ticks += 1;
            }
        }
        assert!(ticks <= 2);
    }

    #[tokio::test]
    async fn stop_polling_leaves_no_ghost_timer() {
        let (tx, mut rx) = mpsc::channel::<MonitorMsg>(64);
        let mut daemon = test_daemon(10);

        daemon.start_polling(&tx);
        daemon.stop_polling();
        assert!(!daemon.polling());

        while rx.try_recv().is_ok() {}

        // Several poll intervals later, the cancelled ticker must not have
        // produced anything new.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stop_polling_without_a_timer_is_a_noop() {
        let mut daemon = test_daemon(10);
        daemon.stop_polling();
        assert!(!daemon.polling());
    }
}
