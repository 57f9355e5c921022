//! Compass Redis Data Layer
//!
//! Async Redis persistence for the Compass school portal. Each aggregate
//! (student, pathway, collaboration record, notification) is stored as a
//! single JSON document under one key, with index sets and hashes alongside.
//! The document content is opaque to this crate; compass-core owns the
//! serialization.

pub mod broadcast;
pub mod client;
pub mod queries;

pub use broadcast::{
    BroadcastReceiver, BroadcastSender, WebSocketMessage, create_broadcast_channel,
};
pub use client::{RedisError, RedisPool, RedisResult, init_pool};
pub use queries::collaborations;
pub use queries::notifications;
pub use queries::pathways;
pub use queries::students;
