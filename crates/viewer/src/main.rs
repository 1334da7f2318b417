//! Scoreboard overlay viewer — count display daemon.
//!
//! Optional env: RELAY_WS_URL, RELAY_URL

use std::env;

use clap::Parser;
use viewer::{cli, relay_client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();

    match cli.command.unwrap_or(cli::Commands::Run) {
        cli::Commands::Run => {
            let ws_url =
                env::var("RELAY_WS_URL").unwrap_or_else(|_| "ws://localhost:3000/ws".to_string());
            relay_client::run(&ws_url, |count| println!("{count}")).await?;
        }
        cli::Commands::Count => {
            let relay_url =
                env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
            let client = reqwest::Client::new();
            let res = client.get(format!("{}/viewers", relay_url)).send().await?;
            if !res.status().is_success() {
                anyhow::bail!("relay returned {}", res.status());
            }
            let body: shared::ViewersResponse = res.json().await?;
            println!("{}", body.count);
        }
    }

    Ok(())
}
