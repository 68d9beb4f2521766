// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vigia",
    version = env!("CARGO_PKG_VERSION"),
    about = "Vigia session liveness watchdog"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Force an immediate liveness check")]
    Check,

    #[command(about = "Report user activity (interaction, visibility or focus)")]
    Activity {
        kind: String,
    },

    #[command(about = "Perform the login redirect now (only valid once locked down)")]
    Redirect,

    #[command(about = "Display current monitor information")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Stop the running Vigia daemon")]
    Stop,
}
