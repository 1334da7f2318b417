//! Route handlers for the count stream and snapshot.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    Json,
};
use futures_util::{SinkExt, StreamExt};
use rand::{thread_rng, Rng};
use tokio::sync::mpsc;
use uuid::Uuid;

use shared::ViewersResponse;

use crate::api::AppState;

const WEBSOCKET_PING_SECS: u64 = 30;

/// Current count snapshot for non-WebSocket consumers.
pub async fn viewers(State(state): State<AppState>) -> Json<ViewersResponse> {
    Json(ViewersResponse {
        count: state.relay.viewer_count(),
    })
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Register the socket, pump broadcasts and keepalives into it, and drain
/// inbound frames until close or error. Clients carry no application
/// payload; their only signals are the transport-level connect and close.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.relay.on_connect(id, tx);

    // Jitter the keepalive so pings from many sockets don't align.
    let mut ping_interval = tokio::time::interval(std::time::Duration::from_millis(
        WEBSOCKET_PING_SECS * 1000 + thread_rng().gen_range(0..=2000),
    ));
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                recv = rx.recv() => {
                    let Some(msg) = recv else { break };
                    let json = match serde_json::to_string(&msg) {
                        Ok(j) => j,
                        Err(_) => continue,
                    };
                    if ws_tx.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(Message::Ping(axum::body::Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // The read side owns the connection's lifetime: any close or transport
    // error ends it and fires the single disconnect for this socket.
    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    state.relay.on_disconnect(id);
    send_task.abort();
}
