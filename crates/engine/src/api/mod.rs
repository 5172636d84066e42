//! API boundary: HTTP routes, WebSocket channel, authentication extractor.

pub mod auth;
pub mod connections;
pub mod http;
pub mod websocket;

pub use connections::ConnectionManager;
