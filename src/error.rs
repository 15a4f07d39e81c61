use thiserror::Error;

/// Errors raised by the generator, the estimator and the session.
///
/// None of these are fatal: a failed fit simply leaves the session without an
/// estimator until the caller retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimatorError {
    /// Empty training sample, or a record with a field out of domain.
    #[error("Insufficient training data: {0}")]
    InsufficientData(String),
    /// A prediction was requested before the session fitted its estimator.
    #[error("Estimator has not been fitted yet.")]
    NotFitted,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EstimatorError {
    pub fn exit_code(&self) -> u8 {
        match self {
            EstimatorError::InvalidQuery(_) | EstimatorError::InvalidConfig(_) => 2,
            EstimatorError::InsufficientData(_) => 3,
            EstimatorError::NotFitted => 4,
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

impl From<EstimatorError> for AppError {
    fn from(err: EstimatorError) -> Self {
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
