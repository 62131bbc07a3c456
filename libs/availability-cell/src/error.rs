use thiserror::Error;

use shared_models::error::AppError;
use shared_utils::form::FormError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid availability form: {0}")]
    Decode(#[from] FormError),
}

impl AvailabilityError {
    /// Dotted path of the offending form field.
    pub fn field(&self) -> &str {
        match self {
            AvailabilityError::Decode(err) => &err.path,
        }
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Decode(FormError { path, reason }) => AppError::InvalidField {
                field: path,
                message: reason.to_string(),
            },
        }
    }
}
