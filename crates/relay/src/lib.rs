//! Scoreboard overlay relay — connection registry and count broadcast.

pub mod api;
pub mod config;
pub mod relay;
