// License: MIT

use serde::Serialize;

/// Snapshot returned from the daemon for `vigia info`.
///
/// - the serialized form is the stable JSON contract.
/// - `pretty_text` is CLI-facing output for `vigia info` without `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoSnapshot {
    pub phase: String,
    pub started_at: String,
    pub elapsed: String,
    pub in_grace_period: bool,
    pub polling: bool,
    pub checks_requested: u64,
    pub suppressed_results: u64,
    pub last_poll: Option<String>,
    pub countdown_remaining: Option<u32>,
    pub page_path: String,
    pub login_destination: String,

    #[serde(skip_serializing)]
    pub pretty_text: String,
}
