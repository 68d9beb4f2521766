// License: MIT

/// Trigger kinds for activity-driven re-checks. Each kind is throttled
/// independently of the others and of the poll timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Interaction,
    Visibility,
    Focus,
}

impl ActivityKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interaction" | "click" => Some(ActivityKind::Interaction),
            "visibility" => Some(ActivityKind::Visibility),
            "focus" => Some(ActivityKind::Focus),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Interaction => "interaction",
            ActivityKind::Visibility => "visibility",
            ActivityKind::Focus => "focus",
        }
    }
}

/// Outcome of one liveness query against the session-status endpoint.
///
/// Transport failures (network error, non-2xx, malformed body) all collapse
/// into `TransportError`: the monitor fails open and retries once, so the
/// distinction carries no behavioral weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollVerdict {
    Active,
    Inactive { message: String },
    TransportError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Poll timer fired.
    Tick {
        now_ms: u64,
    },

    /// Explicit check requested via IPC (`vigia check`).
    ManualCheck {
        now_ms: u64,
    },

    /// Activity reported by the embedding surface.
    Activity {
        kind: ActivityKind,
        now_ms: u64,
    },

    /// A liveness query finished.
    PollCompleted {
        verdict: PollVerdict,
        now_ms: u64,
    },

    /// The one-shot fallback re-check scheduled after a transport error.
    RetryDue {
        now_ms: u64,
    },

    /// One second of the lockdown countdown elapsed.
    CountdownTick {
        now_ms: u64,
    },

    /// The explicit "go to login now" action.
    RedirectRequested {
        now_ms: u64,
    },
}

impl Event {
    pub fn now_ms(&self) -> u64 {
        match self {
            Event::Tick { now_ms }
            | Event::ManualCheck { now_ms }
            | Event::Activity { now_ms, .. }
            | Event::PollCompleted { now_ms, .. }
            | Event::RetryDue { now_ms }
            | Event::CountdownTick { now_ms }
            | Event::RedirectRequested { now_ms } => *now_ms,
        }
    }
}
