//! Query modules, one per aggregate.

pub mod collaborations;
pub mod notifications;
pub mod pathways;
pub mod students;
