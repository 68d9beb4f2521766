// License: MIT

use eyre::{Result, bail};
use serde::Deserialize;

/// Full daemon configuration. Every field has a default matching the
/// EcoPuntos deployment, so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub session: SessionConfig,
    pub redirect: RedirectConfig,
    pub lockdown: LockdownHooks,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session-status endpoint, queried with a GET carrying session
    /// cookies and `X-Requested-With: XMLHttpRequest`.
    pub status_url: String,

    /// Path of the page this watchdog guards; drives the admin/user
    /// redirect decision.
    pub page_path: String,

    /// Optional raw Cookie header value (e.g. `sessionid=...`) when the
    /// process does not share a cookie jar with the guarded session.
    pub session_cookie: Option<String>,

    pub poll_interval_ms: u64,
    pub grace_period_ms: u64,
    pub retry_delay_ms: u64,
    pub activity_throttle_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_url: String::new(),
            page_path: "/".to_string(),
            session_cookie: None,
            poll_interval_ms: 3000,
            grace_period_ms: 5000,
            retry_delay_ms: 5000,
            activity_throttle_ms: 60_000,
            request_timeout_ms: 2500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    pub user_login_path: String,
    pub admin_login_path: String,

    /// A page path containing any of these substrings is an admin page.
    pub admin_prefixes: Vec<String>,

    pub countdown_seconds: u32,

    /// Spacing between the layered navigation attempts.
    pub fallback_delay_ms: u64,
}

impl RedirectConfig {
    /// True when `path` is one of the login surfaces themselves. The
    /// watchdog never runs there: a login page has no session to guard.
    pub fn is_login_surface(&self, path: &str) -> bool {
        path.contains(self.user_login_path.as_str())
            || path.contains(self.admin_login_path.as_str())
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            user_login_path: "/iniciosesion/".to_string(),
            admin_login_path: "/inicioadmin/".to_string(),
            admin_prefixes: vec![
                "/admin/".to_string(),
                "/paneladmin/".to_string(),
                "/usuarioadmin/".to_string(),
                "/canjeadmin/".to_string(),
                "/estadisticasadmin/".to_string(),
            ],
            countdown_seconds: 5,
            fallback_delay_ms: 100,
        }
    }
}

/// Shell hooks run by the command surface during lockdown. Placeholders:
/// `{message}`, `{remaining}`, `{target}` and `{method}` are substituted
/// before the command runs. Unset hooks are skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockdownHooks {
    pub show_command: Option<String>,
    pub countdown_command: Option<String>,
    pub disable_command: Option<String>,
    pub block_navigation_command: Option<String>,
    pub navigate_command: Option<String>,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.session.status_url.trim().is_empty() {
            bail!("session.status_url must be set");
        }
        if self.session.poll_interval_ms == 0 {
            bail!("session.poll_interval_ms must be greater than zero");
        }
        if self.session.retry_delay_ms == 0 {
            bail!("session.retry_delay_ms must be greater than zero");
        }
        if self.redirect.countdown_seconds == 0 {
            bail!("redirect.countdown_seconds must be greater than zero");
        }
        if self.redirect.user_login_path.trim().is_empty()
            || self.redirect.admin_login_path.trim().is_empty()
        {
            bail!("redirect login paths must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses_to_defaults() {
        let cfg: MonitorConfig = toml::from_str("").unwrap();

        assert_eq!(cfg.session.poll_interval_ms, 3000);
        assert_eq!(cfg.session.grace_period_ms, 5000);
        assert_eq!(cfg.session.activity_throttle_ms, 60_000);
        assert_eq!(cfg.redirect.countdown_seconds, 5);
        assert_eq!(cfg.redirect.admin_prefixes.len(), 5);
        assert!(cfg.lockdown.show_command.is_none());
    }

    #[test]
    fn partial_sections_keep_unlisted_defaults() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [session]
            status_url = "https://puntos.example.org/verificar-sesion/"
            page_path = "/paneladmin/reportes/"

            [redirect]
            countdown_seconds = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            cfg.session.status_url,
            "https://puntos.example.org/verificar-sesion/"
        );
        assert_eq!(cfg.session.poll_interval_ms, 3000);
        assert_eq!(cfg.redirect.countdown_seconds, 10);
        assert_eq!(cfg.redirect.user_login_path, "/iniciosesion/");
    }

    #[test]
    fn login_surfaces_are_recognized() {
        let cfg = RedirectConfig::default();

        assert!(cfg.is_login_surface("/iniciosesion/"));
        assert!(cfg.is_login_surface("/inicioadmin/"));
        assert!(!cfg.is_login_surface("/dashboard/"));
    }

    #[test]
    fn validate_rejects_missing_status_url() {
        let cfg = MonitorConfig::default();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let mut cfg = MonitorConfig::default();
        cfg.session.status_url = "https://example.org/s/".to_string();
        cfg.session.poll_interval_ms = 0;

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_config() {
        let mut cfg = MonitorConfig::default();
        cfg.session.status_url = "https://example.org/verificar-sesion/".to_string();

        assert!(cfg.validate().is_ok());
    }
}
