//! CLI argument parsing.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "viewer")]
#[command(about = "Scoreboard overlay viewer — follows the live viewer count")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the live count from the relay and print each update [default]
    Run,

    /// Fetch the current count once over HTTP and exit
    Count,
}
