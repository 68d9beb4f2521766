// License: MIT

use crate::core::events::ActivityKind;

/// Monitor phase. Transitions only forward: `Active -> Closed`, and
/// `Closed` is terminal. The grace period is a time-window condition
/// evaluated against `started_at_ms` on each poll result, never a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Closed,
}

/// Summary of the most recent poll result, kept for `vigia info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastPoll {
    Active,
    InactiveSuppressed,
    InactiveClosed,
    TransportError,
}

impl LastPoll {
    pub fn label(self) -> &'static str {
        match self {
            LastPoll::Active => "active",
            LastPoll::InactiveSuppressed => "inactive (grace period)",
            LastPoll::InactiveClosed => "inactive (closed)",
            LastPoll::TransportError => "transport error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorState {
    phase: Phase,

    // Timing (ms since epoch, supplied by events)
    started_at_ms: u64,

    // Per-kind throttle stamps for activity-triggered checks
    last_interaction_check_ms: Option<u64>,
    last_visibility_check_ms: Option<u64>,
    last_focus_check_ms: Option<u64>,

    // At most one delayed fallback re-check outstanding
    retry_pending: bool,

    // Soft warning flag; reset whenever the server reports the session alive
    warning_shown: bool,

    // Lockdown bookkeeping (meaningful only once Closed)
    countdown_remaining: Option<u32>,
    redirect_started: bool,

    // Counters surfaced by `vigia info`
    checks_requested: u64,
    suppressed_results: u64,

    last_poll: Option<LastPoll>,
}

impl MonitorState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            phase: Phase::Active,
            started_at_ms: now_ms,

            last_interaction_check_ms: None,
            last_visibility_check_ms: None,
            last_focus_check_ms: None,

            retry_pending: false,
            warning_shown: false,

            countdown_remaining: None,
            redirect_started: false,

            checks_requested: 0,
            suppressed_results: 0,

            last_poll: None,
        }
    }

    // ---------------- phase ----------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// Terminal transition. Idempotent; there is no way back.
    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    // ---------------- grace period ----------------

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }

    pub fn in_grace_period(&self, now_ms: u64, grace_period_ms: u64) -> bool {
        self.elapsed_ms(now_ms) < grace_period_ms
    }

    // ---------------- activity throttling ----------------

    /// True when an activity-triggered check of `kind` is allowed at
    /// `now_ms` given the per-kind throttle window. The first trigger of
    /// each kind is always allowed.
    pub fn activity_check_allowed(
        &self,
        kind: ActivityKind,
        now_ms: u64,
        throttle_ms: u64,
    ) -> bool {
        match self.last_activity_check_ms(kind) {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= throttle_ms,
        }
    }

    pub fn mark_activity_check(&mut self, kind: ActivityKind, now_ms: u64) {
        match kind {
            ActivityKind::Interaction => self.last_interaction_check_ms = Some(now_ms),
            ActivityKind::Visibility => self.last_visibility_check_ms = Some(now_ms),
            ActivityKind::Focus => self.last_focus_check_ms = Some(now_ms),
        }
    }

    fn last_activity_check_ms(&self, kind: ActivityKind) -> Option<u64> {
        match kind {
            ActivityKind::Interaction => self.last_interaction_check_ms,
            ActivityKind::Visibility => self.last_visibility_check_ms,
            ActivityKind::Focus => self.last_focus_check_ms,
        }
    }

    // ---------------- retry latch ----------------

    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    pub fn set_retry_pending(&mut self, v: bool) {
        self.retry_pending = v;
    }

    // ---------------- warning flag ----------------

    pub fn warning_shown(&self) -> bool {
        self.warning_shown
    }

    pub fn set_warning_shown(&mut self, v: bool) {
        self.warning_shown = v;
    }

    // ---------------- lockdown countdown ----------------

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown_remaining
    }

    pub fn begin_countdown(&mut self, seconds: u32) {
        self.countdown_remaining = Some(seconds);
    }

    /// Decrement the countdown by one second, saturating at zero.
    /// Returns the new remaining value, or `None` when no countdown runs.
    pub fn tick_countdown(&mut self) -> Option<u32> {
        let next = self.countdown_remaining?.saturating_sub(1);
        self.countdown_remaining = Some(next);
        Some(next)
    }

    pub fn cancel_countdown(&mut self) {
        self.countdown_remaining = None;
    }

    pub fn redirect_started(&self) -> bool {
        self.redirect_started
    }

    pub fn mark_redirect_started(&mut self) {
        self.redirect_started = true;
    }

    // ---------------- counters ----------------

    pub fn checks_requested(&self) -> u64 {
        self.checks_requested
    }

    pub fn note_check_requested(&mut self) {
        self.checks_requested += 1;
    }

    pub fn suppressed_results(&self) -> u64 {
        self.suppressed_results
    }

    pub fn note_suppressed_result(&mut self) {
        self.suppressed_results += 1;
    }

    pub fn last_poll(&self) -> Option<LastPoll> {
        self.last_poll
    }

    pub fn set_last_poll(&mut self, v: LastPoll) {
        self.last_poll = Some(v);
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        MonitorState::new(0)
    }
}
