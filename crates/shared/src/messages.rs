//! WebSocket message types for the realtime leaderboard channel.
//!
//! These types are used by both the engine (sending `ServerMessage`,
//! receiving `ClientMessage`) and any connected client.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing or renaming variants is a breaking change

use serde::{Deserialize, Serialize};

/// Messages from client to server.
///
/// The realtime channel is broadcast-only; clients connect, optionally
/// heartbeat, and listen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Heartbeat ping
    Heartbeat,
}

/// Messages from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// The top of the leaderboard changed: at most 10 entries, points
    /// descending. Emitted once per challenge completion.
    #[serde(rename = "leaderboardUpdate")]
    LeaderboardUpdate { leaders: Vec<LeaderboardEntry> },
    /// Heartbeat reply
    Pong,
    /// Protocol-level failure (e.g., unparseable client message)
    Error { code: String, message: String },
}

/// One ranked entry in a leaderboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user: LeaderboardUser,
    pub points: u32,
}

/// Minimal user display fields joined into a leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardUser {
    pub full_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_update_wire_shape() {
        let msg = ServerMessage::LeaderboardUpdate {
            leaders: vec![LeaderboardEntry {
                user: LeaderboardUser {
                    full_name: "Ada Lovelace".to_string(),
                    email: "ada@example.com".to_string(),
                },
                points: 10,
            }],
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "leaderboardUpdate");
        assert_eq!(json["leaders"][0]["user"]["fullName"], "Ada Lovelace");
        assert_eq!(json["leaders"][0]["points"], 10);
    }

    #[test]
    fn test_client_heartbeat_round_trip() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"heartbeat"}"#).expect("parse");
        assert!(matches!(parsed, ClientMessage::Heartbeat));
    }
}
