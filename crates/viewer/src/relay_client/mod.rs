//! WebSocket client for the viewer-count stream.

mod ws;

pub use ws::{connect, run};
