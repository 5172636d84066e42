//! Shared wire types: WebSocket messages and HTTP response envelopes.

pub mod messages;
pub mod responses;

pub use messages::{ClientMessage, LeaderboardEntry, LeaderboardUser, ServerMessage};
pub use responses::{ApiErrorBody, ApiResponse};
