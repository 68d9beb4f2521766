// License: MIT

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::daemon::Daemon;
use crate::session::probe::HttpSessionProbe;
use crate::surface::command::CommandSurface;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    init_tracing(args.verbose);

    tracing::info!("vigia starting");

    // resolve config path (initial)
    let mut config_path: PathBuf = match args.config.as_deref() {
        Some(p) => p.to_path_buf(),
        None => crate::config::resolve_default_config_path(),
    };

    // bootstrap only if no --config (and bootstrap itself does "only if missing")
    if args.config.is_none() {
        if let Err(e) = crate::config::ensure_user_config_exists() {
            tracing::warn!("failed to bootstrap default config: {e}");
        }

        config_path = crate::config::resolve_default_config_path();
    }

    let cfg = crate::config::load_from_path(&config_path).map_err(|e| {
        tracing::error!("{e:#}");
        e
    })?;

    tracing::debug!(
        "daemon: status_url={}, page_path={}, poll_interval_ms={}, grace_period_ms={}, config_path={}",
        cfg.session.status_url,
        cfg.session.page_path,
        cfg.session.poll_interval_ms,
        cfg.session.grace_period_ms,
        config_path.display(),
    );

    // Login surfaces have no session to guard; starting the monitor there
    // would lock the user out of the page they log in from.
    if cfg.redirect.is_login_surface(&cfg.session.page_path) {
        tracing::info!(
            "page {} is a login surface; monitor not started",
            cfg.session.page_path
        );
        return Ok(());
    }

    let probe = Arc::new(HttpSessionProbe::new(&cfg.session)?);
    let surface = Box::new(CommandSurface::new(cfg.lockdown.clone()));

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut daemon = Daemon::new(cfg, crate::core::utils::now_ms(), probe, surface);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    tokio::select! {
        res = &mut daemon_task => {
            match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err) as AnyError),
            }?;
            Ok(())
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);

            match daemon_task.await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(join_err) => Err(Box::new(join_err)),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
