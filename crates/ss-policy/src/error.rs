use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("fast-track margin must lie strictly between 0 and 1, got {0}")]
    InvalidMargin(f64),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
