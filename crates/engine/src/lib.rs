//! Questboard Engine - gamification backend server.
//!
//! Users complete challenges against products, accrue points, and climb a
//! leaderboard that is broadcast over WebSocket on every completion.

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;
