//! Error types for the panelorder reading-order engine.

use thiserror::Error;

/// Primary error type for ordering operations.
///
/// Only precondition violations are reported; degenerate pages (no objects,
/// no content objects, isolated objects) are ordinary input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("invalid page size {width}x{height}: both dimensions must be positive")]
    InvalidPageSize { width: u32, height: u32 },

    #[error("invalid order parameters: {0}")]
    InvalidParams(String),
}

/// Convenience Result type alias for OrderError.
pub type Result<T> = std::result::Result<T, OrderError>;
