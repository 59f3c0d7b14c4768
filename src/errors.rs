use thiserror::Error;

use crate::external::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message suitable for the inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Api(e) => e.user_message(),
            AppError::Config(_) | AppError::Io(_) => self.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_keep_their_user_message() {
        let err: AppError = ApiError::Server {
            status: 404,
            detail: "Ticker not found".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Ticker not found");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::from("Please select a stock symbol".to_string());
        assert_eq!(err.user_message(), "Please select a stock symbol");
    }
}
