// License: MIT

mod engine;
pub mod redirect;

use crate::config::model::MonitorConfig;

/// The session liveness state machine. Pure and synchronous: it consumes
/// timestamped events and emits actions for the runtime to execute, so the
/// grace/throttle/lockdown arithmetic is testable without timers, sockets
/// or a presentation surface.
#[derive(Debug)]
pub struct Monitor {
    cfg: MonitorConfig,
}

impl Monitor {
    pub fn new(cfg: MonitorConfig) -> Self {
        Self { cfg }
    }

    pub fn cfg(&self) -> &MonitorConfig {
        &self.cfg
    }

    /// Login surface the lockdown redirect will navigate to.
    pub fn login_destination(&self) -> String {
        redirect::login_destination(&self.cfg.session.page_path, &self.cfg.redirect)
    }
}
