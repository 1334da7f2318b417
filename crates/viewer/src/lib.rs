//! Scoreboard overlay viewer — relay client.

pub mod cli;
pub mod relay_client;
