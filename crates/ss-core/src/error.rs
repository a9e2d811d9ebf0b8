//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `SsError` as one variant
//! via `From`, so `?` works across crate boundaries.

use thiserror::Error;

/// Errors raised by `ss-core` itself.
#[derive(Debug, Error)]
pub enum SsError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ss-core`.
pub type SsResult<T> = Result<T, SsError>;
