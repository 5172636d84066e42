//! Realtime notifier port.

use async_trait::async_trait;
use questboard_shared::ServerMessage;

/// Fan-out broadcast to all connected realtime sessions.
///
/// Delivery is best-effort and fire-and-forget: an undeliverable session
/// must never fail the triggering request. Injected into use cases as a
/// capability; business logic never reaches a process-wide channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn broadcast(&self, message: ServerMessage);
}
