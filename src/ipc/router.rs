// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::{
    events::{ActivityKind, Event},
    monitor_msg::MonitorMsg,
    utils::now_ms,
};

/// Routes incoming text commands to the daemon channel and renders the
/// reply. Unknown commands come back as `ERROR: ...` lines the CLI prints
/// verbatim.
pub async fn route_command(cmd: &str, tx: &mpsc::Sender<MonitorMsg>) -> String {
    match cmd {
        "check" => {
            let sent = tx
                .send(MonitorMsg::Event(Event::ManualCheck { now_ms: now_ms() }))
                .await;

            match sent {
                Ok(()) => "Liveness check requested".to_string(),
                Err(_) => "ERROR: daemon is shutting down".to_string(),
            }
        }

        cmd if cmd.starts_with("activity") => {
            let arg = cmd.strip_prefix("activity").unwrap_or("").trim();

            let Some(kind) = ActivityKind::parse(arg) else {
                return format!(
                    "ERROR: unknown activity kind '{arg}' (expected interaction, visibility or focus)"
                );
            };

            let sent = tx
                .send(MonitorMsg::Event(Event::Activity {
                    kind,
                    now_ms: now_ms(),
                }))
                .await;

            match sent {
                Ok(()) => format!("Activity reported: {}", kind.label()),
                Err(_) => "ERROR: daemon is shutting down".to_string(),
            }
        }

        "redirect" => {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx
                .send(MonitorMsg::RequestRedirect { reply: reply_tx })
                .await
                .is_err()
            {
                return "ERROR: daemon is shutting down".to_string();
            }

            match reply_rx.await {
                Ok(Ok(out)) => out,
                Ok(Err(e)) => format!("ERROR: {e}"),
                Err(_) => "ERROR: no reply from daemon".to_string(),
            }
        }

        cmd if cmd.starts_with("info") => {
            let as_json = cmd.contains("--json");

            let (reply_tx, reply_rx) = oneshot::channel();
            if tx
                .send(MonitorMsg::GetInfo { reply: reply_tx })
                .await
                .is_err()
            {
                return "ERROR: daemon is shutting down".to_string();
            }

            match reply_rx.await {
                Ok(snap) => {
                    if as_json {
                        serde_json::to_string(&snap)
                            .unwrap_or_else(|e| format!("ERROR: failed to serialize info: {e}"))
                    } else {
                        snap.pretty_text
                    }
                }
                Err(_) => "ERROR: no reply from daemon".to_string(),
            }
        }

        "stop" => {
            let (reply_tx, reply_rx) = oneshot::channel();
            if tx
                .send(MonitorMsg::StopDaemon { reply: reply_tx })
                .await
                .is_err()
            {
                return "ERROR: daemon is shutting down".to_string();
            }

            match reply_rx.await {
                Ok(Ok(out)) => out,
                Ok(Err(e)) => format!("ERROR: {e}"),
                Err(_) => "ERROR: no reply from daemon".to_string(),
            }
        }

        _ => format!("ERROR: Unknown command '{cmd}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_commands_are_rejected() {
        let (tx, _rx) = mpsc::channel(4);
        let out = route_command("frobnicate", &tx).await;
        assert!(out.starts_with("ERROR: Unknown command"));
    }

    #[tokio::test]
    async fn bad_activity_kind_is_rejected_without_touching_the_daemon() {
        let (tx, mut rx) = mpsc::channel(4);
        let out = route_command("activity dance", &tx).await;

        assert!(out.starts_with("ERROR: unknown activity kind"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn check_command_forwards_a_manual_check_event() {
        let (tx, mut rx) = mpsc::channel(4);
        let out = route_command("check", &tx).await;

        assert_eq!(out, "Liveness check requested");
        assert!(matches!(
            rx.try_recv(),
            Ok(MonitorMsg::Event(Event::ManualCheck { .. }))
        ));
    }

    #[tokio::test]
    async fn activity_command_parses_every_kind() {
        let (tx, mut rx) = mpsc::channel(8);

        for (arg, kind) in [
            ("interaction", ActivityKind::Interaction),
            ("click", ActivityKind::Interaction),
            ("visibility", ActivityKind::Visibility),
            ("focus", ActivityKind::Focus),
        ] {
            let out = route_command(&format!("activity {arg}"), &tx).await;
            assert_eq!(out, format!("Activity reported: {}", kind.label()));

            match rx.try_recv() {
                Ok(MonitorMsg::Event(Event::Activity { kind: got, .. })) => {
                    assert_eq!(got, kind)
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }
}
