//! Error types.
//!
//! - `DataError`: typed failures of the fetch / fill / trajectory core.
//! - `AppError`: what the binary reports (message + process exit code).

use thiserror::Error;

/// Failures produced by the data pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The requested period has no concrete observation at all.
    #[error("No data available for this country/period.")]
    NoUsableData,

    #[error("World Bank request failed: {0}")]
    Network(String),

    #[error("Malformed World Bank response: {0}")]
    Malformed(String),

    /// The API answered with its own error envelope.
    #[error("World Bank API error: {0}")]
    Api(String),

    #[error("Inflation rate {rate} for {year} is not usable (fraction must be > -1).")]
    InvalidRate { year: i32, rate: f64 },

    #[error("{0}")]
    InvalidInput(String),
}

impl DataError {
    /// Exit code used when the error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            DataError::InvalidInput(_) => 2,
            DataError::NoUsableData => 3,
            DataError::Network(_)
            | DataError::Malformed(_)
            | DataError::Api(_)
            | DataError::InvalidRate { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
