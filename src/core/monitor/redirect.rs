// License: MIT

use crate::config::model::RedirectConfig;

/// Pick the login surface for the guarded page: the admin login when the
/// page path contains any configured admin-area prefix, the user login
/// otherwise.
pub fn login_destination(page_path: &str, cfg: &RedirectConfig) -> String {
    let is_admin = cfg
        .admin_prefixes
        .iter()
        .any(|prefix| page_path.contains(prefix.as_str()));

    if is_admin {
        cfg.admin_login_path.clone()
    } else {
        cfg.user_login_path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_area_paths_go_to_admin_login() {
        let cfg = RedirectConfig::default();

        assert_eq!(login_destination("/paneladmin/reportes/", &cfg), "/inicioadmin/");
        assert_eq!(login_destination("/usuarioadmin/", &cfg), "/inicioadmin/");
        assert_eq!(login_destination("/canjeadmin/lote/3/", &cfg), "/inicioadmin/");
    }

    #[test]
    fn everything_else_goes_to_user_login() {
        let cfg = RedirectConfig::default();

        assert_eq!(login_destination("/dashboard/", &cfg), "/iniciosesion/");
        assert_eq!(login_destination("/", &cfg), "/iniciosesion/");
        // Prefix matching is substring-based, but an unrelated path that
        // merely mentions "admin" without a configured prefix is not admin.
        assert_eq!(login_destination("/administracion-info/", &cfg), "/iniciosesion/");
    }

    #[test]
    fn prefix_may_appear_mid_path() {
        let cfg = RedirectConfig::default();

        assert_eq!(
            login_destination("/es/paneladmin/usuarios/", &cfg),
            "/inicioadmin/"
        );
    }
}
