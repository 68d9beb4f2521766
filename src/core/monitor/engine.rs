// License: MIT

use crate::core::{
    action::Action,
    error::{Error, StateError},
    events::{Event, PollVerdict},
    state::{LastPoll, MonitorState},
};

use super::Monitor;

impl Monitor {
    /// Advance the state machine by one event.
    ///
    /// The phase guard runs synchronously at entry: once `Closed`, every
    /// check-producing event is a no-op, so duplicate in-flight poll
    /// results cannot double-run the lockdown sequence. Only the lockdown
    /// machinery itself (countdown ticks, the explicit redirect request)
    /// is still processed after closing.
    pub fn handle_event(
        &self,
        state: &mut MonitorState,
        event: Event,
    ) -> Result<Vec<Action>, Error> {
        let now_ms = event.now_ms();

        match event {
            Event::Tick { .. } | Event::ManualCheck { .. } => {
                if state.is_closed() {
                    return Ok(Vec::new());
                }

                state.note_check_requested();
                Ok(vec![Action::CheckLiveness])
            }

            Event::Activity { kind, .. } => {
                if state.is_closed() {
                    return Ok(Vec::new());
                }

                let throttle_ms = self.cfg.session.activity_throttle_ms;
                if !state.activity_check_allowed(kind, now_ms, throttle_ms) {
                    tracing::debug!(kind = kind.label(), "activity check throttled");
                    return Ok(Vec::new());
                }

                state.mark_activity_check(kind, now_ms);
                state.note_check_requested();
                tracing::debug!(kind = kind.label(), "activity-triggered check");
                Ok(vec![Action::CheckLiveness])
            }

            Event::PollCompleted { verdict, .. } => {
                if state.is_closed() {
                    return Ok(Vec::new());
                }

                Ok(self.apply_poll_verdict(state, verdict, now_ms))
            }

            Event::RetryDue { .. } => {
                state.set_retry_pending(false);

                if state.is_closed() {
                    return Ok(Vec::new());
                }

                state.note_check_requested();
                Ok(vec![Action::CheckLiveness])
            }

            Event::CountdownTick { .. } => {
                if !state.is_closed() || state.redirect_started() {
                    return Ok(Vec::new());
                }

                let Some(remaining) = state.tick_countdown() else {
                    return Ok(Vec::new());
                };

                if remaining == 0 {
                    state.mark_redirect_started();
                    return Ok(vec![
                        Action::UpdateCountdown { remaining: 0 },
                        Action::Redirect {
                            target: self.login_destination(),
                        },
                    ]);
                }

                Ok(vec![Action::UpdateCountdown { remaining }])
            }

            Event::RedirectRequested { .. } => {
                if !state.is_closed() {
                    return Err(Error::InvalidState(StateError::NotLockedDown));
                }
                if state.redirect_started() {
                    return Ok(Vec::new());
                }

                state.mark_redirect_started();
                state.cancel_countdown();
                Ok(vec![Action::Redirect {
                    target: self.login_destination(),
                }])
            }
        }
    }

    fn apply_poll_verdict(
        &self,
        state: &mut MonitorState,
        verdict: PollVerdict,
        now_ms: u64,
    ) -> Vec<Action> {
        match verdict {
            PollVerdict::Active => {
                state.set_warning_shown(false);
                state.set_last_poll(LastPoll::Active);
                Vec::new()
            }

            PollVerdict::Inactive { message } => {
                let grace_ms = self.cfg.session.grace_period_ms;

                if state.in_grace_period(now_ms, grace_ms) {
                    // Freshly created sessions can read as inactive before
                    // the server commits them; treat as transient.
                    state.note_suppressed_result();
                    state.set_last_poll(LastPoll::InactiveSuppressed);
                    tracing::debug!(
                        elapsed_ms = state.elapsed_ms(now_ms),
                        "inactive result within grace period, suppressed"
                    );
                    return Vec::new();
                }

                state.close();
                state.set_last_poll(LastPoll::InactiveClosed);

                let countdown_seconds = self.cfg.redirect.countdown_seconds;
                state.begin_countdown(countdown_seconds);

                tracing::info!(%message, "session closed externally, locking down");
                vec![
                    Action::StopPolling,
                    Action::BeginLockdown {
                        message,
                        countdown_seconds,
                    },
                ]
            }

            PollVerdict::TransportError => {
                state.set_last_poll(LastPoll::TransportError);

                if state.retry_pending() {
                    return Vec::new();
                }

                state.set_retry_pending(true);
                vec![Action::ScheduleRetry {
                    delay_ms: self.cfg.session.retry_delay_ms,
                }]
            }
        }
    }
}
