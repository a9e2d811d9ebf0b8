use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("wave parse error: {0}")]
    Parse(String),

    #[error("invalid task size range {min}..={max}")]
    InvalidRange { min: u64, max: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkloadResult<T> = Result<T, WorkloadError>;
