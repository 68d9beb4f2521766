// License: MIT

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::mpsc,
    time::{Duration, timeout},
};

use crate::core::monitor_msg::MonitorMsg;

use super::router::route_command;

pub async fn spawn_ipc_server(tx: mpsc::Sender<MonitorMsg>) -> Result<(), String> {
    let path = super::socket_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    // A stale socket from a crashed run would make bind fail.
    if path.exists() {
        let _ = std::fs::remove_file(&path);
    }

    let listener = UnixListener::bind(&path)
        .map_err(|e| format!("failed to bind {}: {e}", path.display()))?;

    tracing::info!("ipc: listening on {}", path.display());

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(Duration::from_secs(10), async {
                            if let Err(e) = handle_connection(&mut stream, tx).await {
                                tracing::error!("ipc: connection error: {}", e);
                            }
                        })
                        .await;

                        if result.is_err() {
                            tracing::error!("ipc: connection timed out after 10 seconds");
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => tracing::error!("ipc: failed to accept connection: {}", e),
            }
        }
    });

    Ok(())
}

async fn handle_connection(
    stream: &mut UnixStream,
    tx: mpsc::Sender<MonitorMsg>,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; 256];
    let n = stream.read(&mut buf).await?;

    if n == 0 {
        return Ok(());
    }

    let cmd = String::from_utf8_lossy(&buf[..n]).trim().to_string();
    tracing::debug!("ipc: received command: {}", cmd);

    let response = route_command(&cmd, &tx).await;

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok(())
}
