//! Application state.

use compass_redis::{BroadcastSender, RedisPool, WebSocketMessage, create_broadcast_channel};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RedisPool>,
    pub tx: BroadcastSender,
}

impl AppState {
    pub fn new(db: Arc<RedisPool>) -> Self {
        Self {
            db,
            tx: create_broadcast_channel(),
        }
    }

    /// Broadcast a message to all WebSocket clients.
    pub fn broadcast(&self, msg: WebSocketMessage) {
        let _ = self.tx.send(msg);
    }
}
