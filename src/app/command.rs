// License: MIT

use crate::cli::{Args, Command};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run(args: Args) -> Result<(), AnyError> {
    // command mode: args.command is Some
    let cmd = args.command.as_ref().expect("command mode");

    match cmd {
        Command::Check => {
            match crate::ipc::client::send_raw("check").await {
                Ok(resp) => {
                    let out = resp.trim_end();
                    if out.is_empty() {
                        println!("Liveness check requested");
                    } else {
                        println!("{out}");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("vigia: {e}");
                    Ok(())
                }
            }
        }

        Command::Activity { kind } => {
            let msg = format!("activity {kind}");

            match crate::ipc::client::send_raw(&msg).await {
                Ok(resp) => {
                    let out = resp.trim_end();
                    if !out.is_empty() {
                        println!("{out}");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("vigia: {e}");
                    Ok(())
                }
            }
        }

        Command::Redirect => {
            match crate::ipc::client::send_raw("redirect").await {
                Ok(resp) => {
                    let out = resp.trim_end();
                    if !out.is_empty() {
                        println!("{out}");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("vigia: {e}");
                    Ok(())
                }
            }
        }

        Command::Info { json } => {
            let msg = if *json { "info --json" } else { "info" };

            match crate::ipc::client::send_raw(msg).await {
                Ok(resp) => {
                    if !resp.is_empty() {
                        println!("{resp}");
                    }
                    Ok(())
                }
                Err(e) => {
                    if *json {
                        // Keep valid JSON on stdout even when the daemon
                        // is not running, for scripted consumers.
                        println!(
                            "{}",
                            r#"{"phase":"not_running","started_at":null,"elapsed":null}"#
                        );
                    } else {
                        eprintln!("vigia: {e}");
                    }
                    Ok(())
                }
            }
        }

        Command::Stop => {
            match crate::ipc::client::send_raw("stop").await {
                Ok(resp) => {
                    let out = resp.trim_end();
                    if out.is_empty() {
                        println!("Stopping Vigia daemon");
                    } else {
                        println!("{out}");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("vigia: {e}");
                    Ok(())
                }
            }
        }
    }
}
