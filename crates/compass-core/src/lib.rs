//! Compass Core Library
//!
//! Domain models and business logic for the Compass admission portal:
//! students, admission pathways with milestone tracking, collaboration
//! records, and notifications.

pub mod collaboration;
pub mod error;
pub mod notification;
pub mod pathway;
pub mod student;

pub use error::{CoreError, CoreResult};
