// License: MIT

pub mod model;

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use self::model::MonitorConfig;

/// Determine the default config path: user config first, then the
/// system-wide fallback. When neither exists yet, the user path is
/// returned so bootstrap can create it.
pub fn resolve_default_config_path() -> PathBuf {
    let user_path = user_config_path();
    if let Some(ref p) = user_path {
        if p.exists() {
            return p.clone();
        }
    }

    let system_path = PathBuf::from("/etc/vigia/vigia.toml");
    if system_path.exists() {
        return system_path;
    }

    user_path.unwrap_or(system_path)
}

fn user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config/vigia/vigia.toml");
    Some(path)
}

pub fn load_from_path(path: &Path) -> Result<MonitorConfig> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;

    let cfg: MonitorConfig = toml::from_str(&raw)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;

    cfg.validate()
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;

    Ok(cfg)
}

/// Write a commented default config to the user path, only if missing.
pub fn ensure_user_config_exists() -> Result<()> {
    let Some(path) = user_config_path() else {
        return Ok(());
    };
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, DEFAULT_CONFIG)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;

    tracing::info!("wrote default config to {}", path.display());
    Ok(())
}

pub const DEFAULT_CONFIG: &str = r#"# Vigia session liveness watchdog

[session]
# Session-status endpoint. Must answer GET with {"activa": bool, "message": str}.
status_url = ""
# Path of the page this watchdog guards.
page_path = "/"
# Uncomment to send an explicit Cookie header with every check:
# session_cookie = "sessionid=..."
poll_interval_ms = 3000
grace_period_ms = 5000
retry_delay_ms = 5000
activity_throttle_ms = 60000
request_timeout_ms = 2500

[redirect]
user_login_path = "/iniciosesion/"
admin_login_path = "/inicioadmin/"
admin_prefixes = ["/admin/", "/paneladmin/", "/usuarioadmin/", "/canjeadmin/", "/estadisticasadmin/"]
countdown_seconds = 5
fallback_delay_ms = 100

[lockdown]
# Shell hooks run during lockdown. Placeholders: {message}, {remaining},
# {target}, {method}.
# show_command = "notify-send -u critical 'Sesion cerrada' '{message}'"
# countdown_command = ""
# disable_command = ""
# block_navigation_command = ""
# navigate_command = ""
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_template_parses_and_only_lacks_status_url() {
        let cfg: MonitorConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(cfg.validate().is_err());

        let mut cfg = cfg;
        cfg.session.status_url = "https://example.org/verificar-sesion/".to_string();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn load_from_path_round_trips_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigia.toml");

        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
            [session]
            status_url = "https://puntos.example.org/verificar-sesion/"
            page_path = "/canjeadmin/"
            "#
        )
        .unwrap();

        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.session.page_path, "/canjeadmin/");
        assert_eq!(cfg.session.poll_interval_ms, 3000);
    }

    #[test]
    fn load_from_path_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigia.toml");

        std::fs::write(
            &path,
            "[session]\nstatus_url = \"https://e.org/\"\npoll_interval_ms = 0\n",
        )
        .unwrap();

        assert!(load_from_path(&path).is_err());
    }
}
