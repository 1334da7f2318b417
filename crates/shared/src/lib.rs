//! Shared wire types for the relay server and its clients.

mod models;

pub use models::{ServerMessage, ViewersResponse};
