// License: MIT

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Issue a liveness query against the session-status endpoint.
    /// The runtime feeds the result back as `Event::PollCompleted`.
    CheckLiveness,

    /// Schedule the one-shot fallback re-check after a transport error.
    ScheduleRetry {
        delay_ms: u64,
    },

    /// Cancel the repeating poll timer. Emitted exactly once, on lockdown.
    StopPolling,

    /// Enter the lockdown presentation: blocking notice with the verbatim
    /// server message, interaction disabled, navigation blocked, countdown
    /// started.
    BeginLockdown {
        message: String,
        countdown_seconds: u32,
    },

    /// Refresh the visible countdown.
    UpdateCountdown {
        remaining: u32,
    },

    /// Run the layered redirect chain towards the login surface.
    Redirect {
        target: String,
    },
}
