//! Connection registry and viewer-count broadcast.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use shared::ServerMessage;

/// Sender half of one connection's outbound queue. The receiving end is
/// drained by that connection's socket-writer task.
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Registry of open connections, and with it the viewer count: the count
/// put on the wire is always the registry size at the instant the sends
/// were queued.
///
/// Every mutation runs inside one critical section, so each broadcast
/// carries the count that was true when its own event was applied and no
/// torn updates are possible on a multi-threaded runtime.
pub struct RelayState {
    clients: Mutex<HashMap<Uuid, ClientSender>>,
}

impl RelayState {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Current number of registered connections.
    pub fn viewer_count(&self) -> u64 {
        self.clients.lock().unwrap().len() as u64
    }

    /// Register an accepted connection and announce the new count to every
    /// registered connection, the new one included.
    pub fn on_connect(&self, id: Uuid, tx: ClientSender) {
        let mut clients = self.clients.lock().unwrap();
        clients.insert(id, tx);
        let count = clients.len() as u64;
        tracing::info!(%id, count, "viewer connected");
        Self::fan_out(&clients, ServerMessage::Count { count });
    }

    /// Drop a closed connection and announce the new count to the rest.
    /// A second close event for the same connection is a no-op: nothing is
    /// removed, nothing is broadcast.
    pub fn on_disconnect(&self, id: Uuid) {
        let mut clients = self.clients.lock().unwrap();
        if clients.remove(&id).is_none() {
            return;
        }
        let count = clients.len() as u64;
        tracing::info!(%id, count, "viewer disconnected");
        Self::fan_out(&clients, ServerMessage::Count { count });
    }

    /// Best-effort fan-out to every registered connection.
    pub fn broadcast(&self, msg: ServerMessage) {
        let clients = self.clients.lock().unwrap();
        Self::fan_out(&clients, msg);
    }

    /// Queue `msg` on each connection. A closed queue means that socket is
    /// already on its way out, so the failure is logged and the loop moves
    /// on. Failed sends never touch the registry; only the transport's own
    /// close/error path removes a connection.
    fn fan_out(clients: &HashMap<Uuid, ClientSender>, msg: ServerMessage) {
        for (id, tx) in clients {
            if tx.send(msg).is_err() {
                tracing::warn!(%id, "skipping broadcast to closed connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn client() -> (Uuid, ClientSender, UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Uuid::new_v4(), tx, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<u64> {
        let mut counts = Vec::new();
        while let Ok(ServerMessage::Count { count }) = rx.try_recv() {
            counts.push(count);
        }
        counts
    }

    #[test]
    fn count_tracks_connects_and_disconnects() {
        let state = RelayState::new();
        let (id_a, tx_a, _rx_a) = client();
        let (id_b, tx_b, _rx_b) = client();

        assert_eq!(state.viewer_count(), 0);
        state.on_connect(id_a, tx_a);
        assert_eq!(state.viewer_count(), 1);
        state.on_connect(id_b, tx_b);
        assert_eq!(state.viewer_count(), 2);
        state.on_disconnect(id_a);
        assert_eq!(state.viewer_count(), 1);
        state.on_disconnect(id_b);
        assert_eq!(state.viewer_count(), 0);
    }

    #[test]
    fn duplicate_close_is_a_noop() {
        let state = RelayState::new();
        let (id_a, tx_a, mut rx_a) = client();
        let (id_b, tx_b, _rx_b) = client();

        state.on_connect(id_a, tx_a);
        state.on_connect(id_b, tx_b);
        state.on_disconnect(id_b);
        assert_eq!(state.viewer_count(), 1);
        drain(&mut rx_a);

        // Error followed by close on the same socket delivers twice.
        state.on_disconnect(id_b);
        assert_eq!(state.viewer_count(), 1);
        assert!(drain(&mut rx_a).is_empty());
    }

    #[test]
    fn nth_connect_reaches_all_n_connections() {
        let state = RelayState::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (id, tx, rx) = client();
            state.on_connect(id, tx);
            receivers.push(rx);
        }

        for (i, rx) in receivers.iter_mut().enumerate() {
            let counts = drain(rx);
            // Client i joined at count i+1 and saw every later connect.
            assert_eq!(counts, ((i as u64 + 1)..=3).collect::<Vec<_>>());
        }
    }

    #[test]
    fn send_failure_is_isolated() {
        let state = RelayState::new();
        let (id_a, tx_a, mut rx_a) = client();
        let (id_b, tx_b, rx_b) = client();
        let (id_c, tx_c, mut rx_c) = client();

        state.on_connect(id_a, tx_a);
        state.on_connect(id_b, tx_b);
        state.on_connect(id_c, tx_c);
        drain(&mut rx_a);
        drain(&mut rx_c);

        // B's socket task died without a close event yet; sends to it fail.
        drop(rx_b);

        state.broadcast(ServerMessage::Count { count: 3 });

        assert_eq!(drain(&mut rx_a), vec![3]);
        assert_eq!(drain(&mut rx_c), vec![3]);
        // The failed send did not count as a disconnect.
        assert_eq!(state.viewer_count(), 3);
        state.on_disconnect(id_b);
        assert_eq!(state.viewer_count(), 2);
    }

    #[test]
    fn scenario_two_viewers_one_leaves() {
        let state = RelayState::new();
        let (id_a, tx_a, mut rx_a) = client();
        let (id_b, tx_b, mut rx_b) = client();

        state.on_connect(id_a, tx_a);
        assert_eq!(drain(&mut rx_a), vec![1]);

        state.on_connect(id_b, tx_b);
        assert_eq!(drain(&mut rx_a), vec![2]);
        assert_eq!(drain(&mut rx_b), vec![2]);

        state.on_disconnect(id_a);
        assert_eq!(drain(&mut rx_b), vec![1]);
        assert!(drain(&mut rx_a).is_empty());
    }
}
