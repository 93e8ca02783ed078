use thiserror::Error;

/// Failure of a single remote call or of local draft validation.
///
/// Call sites collapse every variant into one "operation failed" signal for
/// the user; the variant only matters for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
