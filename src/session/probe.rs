// License: MIT

use std::future::Future;
use std::time::Duration;

use eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::config::model::SessionConfig;
use crate::core::events::PollVerdict;

/// Seam between the state machine runtime and the session-status
/// collaborator. Tests substitute a scripted probe.
pub trait SessionProbe: Send + Sync {
    fn check(&self) -> impl Future<Output = PollVerdict> + Send;
}

/// Wire shape of the status endpoint: `{"activa": bool, "message": str}`.
#[derive(Debug, Deserialize)]
struct SessionStatus {
    activa: bool,
    #[serde(default)]
    message: String,
}

/// Parse a status body into a verdict. Malformed JSON is a transport
/// error: the monitor fails open rather than guessing.
pub fn parse_status_body(body: &str) -> PollVerdict {
    match serde_json::from_str::<SessionStatus>(body) {
        Ok(status) if status.activa => PollVerdict::Active,
        Ok(status) => PollVerdict::Inactive {
            message: status.message,
        },
        Err(e) => {
            tracing::debug!("malformed status body: {e}");
            PollVerdict::TransportError
        }
    }
}

/// HTTP probe against the configured endpoint. Carries session cookies
/// (shared jar, plus an optional explicit Cookie header) and the
/// `X-Requested-With` marker the server expects from its own pages.
pub struct HttpSessionProbe {
    client: reqwest::Client,
    status_url: String,
    session_cookie: Option<String>,
}

impl HttpSessionProbe {
    pub fn new(cfg: &SessionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .wrap_err("failed to build HTTP client")?;

        Ok(Self {
            client,
            status_url: cfg.status_url.clone(),
            session_cookie: cfg.session_cookie.clone(),
        })
    }
}

impl SessionProbe for HttpSessionProbe {
    fn check(&self) -> impl Future<Output = PollVerdict> + Send {
        async move {
            let mut req = self
                .client
                .get(&self.status_url)
                .header("X-Requested-With", "XMLHttpRequest");

            if let Some(cookie) = &self.session_cookie {
                req = req.header(reqwest::header::COOKIE, cookie);
            }

            let resp = match req.send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!("liveness query failed: {e}");
                    return PollVerdict::TransportError;
                }
            };

            if !resp.status().is_success() {
                tracing::debug!("liveness query returned {}", resp.status());
                return PollVerdict::TransportError;
            }

            match resp.text().await {
                Ok(body) => parse_status_body(&body),
                Err(e) => {
                    tracing::debug!("failed to read status body: {e}");
                    PollVerdict::TransportError
                }
            }
        }
    }
}
