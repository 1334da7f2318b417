//! Server → client protocol and HTTP snapshot models.

use serde::{Deserialize, Serialize};

/// A message pushed by the relay over the WebSocket.
///
/// Tagged by `type`. A payload with an unrecognized tag fails to
/// deserialize; clients drop those frames, which leaves room for new
/// message kinds without breaking old viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Number of currently open connections, sent after every
    /// connect/disconnect the relay observes.
    Count { count: u64 },
}

/// Response body for `GET /viewers`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewersResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_message_wire_shape() {
        let json = serde_json::to_string(&ServerMessage::Count { count: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"count","count":3}"#);
    }

    #[test]
    fn count_message_parses() {
        let msg: ServerMessage = serde_json::from_str(r#"{"type":"count","count":5}"#).unwrap();
        assert_eq!(msg, ServerMessage::Count { count: 5 });
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ServerMessage>(r#"{"type":"ping"}"#).is_err());
    }

    #[test]
    fn negative_count_is_rejected() {
        assert!(serde_json::from_str::<ServerMessage>(r#"{"type":"count","count":-1}"#).is_err());
    }
}
