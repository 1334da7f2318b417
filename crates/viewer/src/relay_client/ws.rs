//! Connection handling for the count stream.

use anyhow::Result;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use shared::ServerMessage;

const RECONNECT_DELAY_SECS: u64 = 5;

/// Parse one text frame and hand any count update to the display callback.
/// Malformed payloads and unrecognized message types are dropped without
/// invoking it.
fn dispatch_text(text: &str, on_count: &mut impl FnMut(u64)) {
    if let Ok(ServerMessage::Count { count }) = serde_json::from_str(text) {
        on_count(count);
    }
}

/// Open one connection and stream count updates into `on_count` until the
/// relay closes the socket or the transport errors. Reconnection policy
/// belongs to the caller.
pub async fn connect(url: &str, mut on_count: impl FnMut(u64)) -> Result<()> {
    let (ws, _) = connect_async(url).await?;
    let (_, mut ws_rx) = ws.split();

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => dispatch_text(&text, &mut on_count),
            Ok(Message::Close(_)) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
    }

    Ok(())
}

/// Daemon loop: re-dial whenever the connection drops.
pub async fn run(url: &str, mut on_count: impl FnMut(u64)) -> Result<()> {
    loop {
        match connect(url, &mut on_count).await {
            Ok(()) => tracing::info!("Relay closed the connection"),
            Err(e) => tracing::warn!("Connection error: {}", e),
        }
        tracing::info!("Reconnecting in {}s", RECONNECT_DELAY_SECS);
        tokio::time::sleep(tokio::time::Duration::from_secs(RECONNECT_DELAY_SECS)).await;
    }
}
