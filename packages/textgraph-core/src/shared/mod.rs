//! Shared models and utilities

pub mod cancellation;
pub mod models;
pub mod serde_duration;

pub use cancellation::CancellationToken;
