//! # AppError
//!
//! Centralized error taxonomy for Rusty-Tracker. Handlers convert these to
//! HTTP responses at the boundary; the store plugins surface infrastructure
//! faults through `anyhow` and the API layer wraps them into `Internal`.

use thiserror::Error;

/// The primary error type for rt-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Mutation target does not exist (e.g. "Item not found").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Infrastructure failure; the message is the generic caller-facing
    /// wording, never the underlying cause.
    #[error("{0}")]
    Internal(String),
}

/// A specialized Result type for Rusty-Tracker logic.
pub type Result<T> = std::result::Result<T, AppError>;
