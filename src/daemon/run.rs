// License: MIT

use tokio::sync::{mpsc, watch};

use crate::core::{
    action::Action,
    events::Event,
    monitor_msg::MonitorMsg,
    utils::now_ms,
};
use crate::session::probe::SessionProbe;

use super::{AnyError, Daemon};

impl<P: SessionProbe + 'static> Daemon<P> {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        tracing::info!("daemon starting");

        let (tx, mut rx) = mpsc::channel::<MonitorMsg>(64);

        if let Err(e) = crate::ipc::server::spawn_ipc_server(tx.clone()).await {
            tracing::warn!("ipc: failed to start: {}", e);
        }

        self.start_polling(&tx);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("daemon stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        tracing::info!("daemon stopping (event channel closed)");
                        break;
                    };

                    match msg {
                        MonitorMsg::Event(event) => {
                            self.dispatch_event(event, &tx).await;
                        }

                        MonitorMsg::GetInfo { reply } => {
                            let _ = reply.send(self.snapshot(now_ms()));
                        }

                        MonitorMsg::RequestRedirect { reply } => {
                            let event = Event::RedirectRequested { now_ms: now_ms() };

                            match self.monitor.handle_event(&mut self.state, event) {
                                Ok(actions) => {
                                    let target = actions.iter().find_map(|a| match a {
                                        Action::Redirect { target } => Some(target.clone()),
                                        _ => None,
                                    });

                                    let out = match target {
                                        Some(t) => Ok(format!("Redirecting to {t}")),
                                        None => Ok("Redirect already in progress".to_string()),
                                    };
                                    let _ = reply.send(out);

                                    for action in actions {
                                        self.exec_action(action, &tx).await;
                                    }
                                }
                                Err(e) => {
                                    let _ = reply.send(Err(e.to_string()));
                                }
                            }
                        }

                        MonitorMsg::StopDaemon { reply } => {
                            tracing::info!("daemon stopping (stop requested via IPC)");
                            let _ = reply.send(Ok("Stopping Vigia daemon".to_string()));
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                    }
                }
            }
        }

        self.stop_polling();
        self.abort_countdown();

        Ok(())
    }

    async fn dispatch_event(&mut self, event: Event, tx: &mpsc::Sender<MonitorMsg>) {
        match self.monitor.handle_event(&mut self.state, event) {
            Ok(actions) => {
                for action in actions {
                    self.exec_action(action, tx).await;
                }
            }
            Err(e) => {
                tracing::error!("handle_event failed: {e}");
            }
        }
    }
}
