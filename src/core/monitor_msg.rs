// License: MIT

use tokio::sync::oneshot;

use crate::core::{events::Event, info::InfoSnapshot};

#[derive(Debug)]
pub enum MonitorMsg {
    Event(Event),

    GetInfo { reply: oneshot::Sender<InfoSnapshot> },

    /// The explicit "go to login now" action; replies with the outcome so
    /// the CLI can report a redirect requested before lockdown as an error.
    RequestRedirect {
        reply: oneshot::Sender<Result<String, String>>,
    },

    StopDaemon {
        reply: oneshot::Sender<Result<String, String>>,
    },
}
