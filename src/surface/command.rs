// License: MIT

use crate::config::model::LockdownHooks;
use crate::core::utils::{escape_single_quotes, run_shell_command_silent};

use super::{LockdownSurface, NavigateMethod};

/// Lockdown surface that executes configured shell hooks. Hooks left unset
/// in the config are skipped silently; the lockdown still logs so the
/// sequence stays observable with an empty `[lockdown]` section.
pub struct CommandSurface {
    hooks: LockdownHooks,
}

impl CommandSurface {
    pub fn new(hooks: LockdownHooks) -> Self {
        Self { hooks }
    }

    fn run_hook(&self, hook: Option<&String>, label: &str, fill: &[(&str, String)]) {
        let Some(template) = hook else {
            return;
        };

        let cmd = render_hook(template, fill);
        if let Err(e) = run_shell_command_silent(&cmd) {
            tracing::error!("lockdown {label} hook failed: {e}");
        }
    }
}

/// Substitute `{name}` placeholders. Values are escaped for single-quoted
/// shell interpolation since hooks typically quote them.
fn render_hook(template: &str, fill: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in fill {
        out = out.replace(&format!("{{{name}}}"), &escape_single_quotes(value));
    }
    out
}

impl LockdownSurface for CommandSurface {
    fn show_lockdown(&mut self, message: &str, countdown_seconds: u32) {
        tracing::info!(%message, countdown_seconds, "lockdown notice shown");
        self.run_hook(
            self.hooks.show_command.as_ref(),
            "show",
            &[
                ("message", message.to_string()),
                ("remaining", countdown_seconds.to_string()),
            ],
        );
    }

    fn update_countdown(&mut self, remaining: u32) {
        tracing::debug!(remaining, "lockdown countdown");
        self.run_hook(
            self.hooks.countdown_command.as_ref(),
            "countdown",
            &[("remaining", remaining.to_string())],
        );
    }

    fn disable_interaction(&mut self) {
        tracing::info!("interaction disabled");
        self.run_hook(self.hooks.disable_command.as_ref(), "disable", &[]);
    }

    fn block_navigation(&mut self) {
        tracing::info!("navigation blocked");
        self.run_hook(
            self.hooks.block_navigation_command.as_ref(),
            "block-navigation",
            &[],
        );
    }

    fn navigate(&mut self, target: &str, method: NavigateMethod) {
        tracing::info!(%target, %method, "navigate");
        self.run_hook(
            self.hooks.navigate_command.as_ref(),
            "navigate",
            &[
                ("target", target.to_string()),
                ("method", method.as_str().to_string()),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_hook_substitutes_all_placeholders() {
        let cmd = render_hook(
            "notify '{message}' in {remaining}s",
            &[
                ("message", "Sesión cerrada".to_string()),
                ("remaining", "5".to_string()),
            ],
        );

        assert_eq!(cmd, "notify 'Sesión cerrada' in 5s");
    }

    #[test]
    fn render_hook_escapes_single_quotes_in_values() {
        let cmd = render_hook(
            "notify '{message}'",
            &[("message", "it's over".to_string())],
        );

        assert_eq!(cmd, r"notify 'it'\''s over'");
    }

    #[test]
    fn render_hook_leaves_unknown_placeholders_alone() {
        let cmd = render_hook("echo {target} {other}", &[("target", "/x/".to_string())]);
        assert_eq!(cmd, "echo /x/ {other}");
    }
}
