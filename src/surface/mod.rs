// License: MIT

pub mod command;

use std::fmt;

/// How a navigation attempt is performed. The chain runs in this order;
/// later methods are blunter fallbacks for a primary attempt that did not
/// take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateMethod {
    Assign,
    Replace,
    ForceReload,
}

impl NavigateMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            NavigateMethod::Assign => "assign",
            NavigateMethod::Replace => "replace",
            NavigateMethod::ForceReload => "force-reload",
        }
    }
}

impl fmt::Display for NavigateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation side of the lockdown sequence, kept behind a trait so the
/// state machine and the runtime sequencing are testable without any real
/// surface. The shipped implementation runs operator-configured shell
/// hooks; tests record calls.
pub trait LockdownSurface: Send {
    /// Render the blocking notice with the verbatim server message and the
    /// initial countdown value.
    fn show_lockdown(&mut self, message: &str, countdown_seconds: u32);

    /// Refresh the visible countdown.
    fn update_countdown(&mut self, remaining: u32);

    /// Disable every interactive element the surface controls.
    fn disable_interaction(&mut self);

    /// Suppress navigation away from the locked surface until the redirect
    /// itself runs.
    fn block_navigation(&mut self);

    /// Navigate to `target`. Best-effort; failures are logged, never
    /// propagated, because the next method in the chain is the recovery.
    fn navigate(&mut self, target: &str, method: NavigateMethod);
}
