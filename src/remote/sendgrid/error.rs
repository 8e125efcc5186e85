use thiserror::Error;

use crate::remote::StoreError;

/// SendGrid-specific errors that can occur during API operations.
///
/// SECURITY: Error messages must NEVER contain the API key.
#[derive(Debug, Error)]
pub enum SendgridError {
    /// Authentication failed (invalid key or missing scope)
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("template version '{id}' of template '{template_id}' not found")]
    NotFound { template_id: String, id: String },

    /// Response body did not match the expected shape
    #[error("failed to parse response: {message}")]
    Decode { message: String },
}

impl From<SendgridError> for StoreError {
    fn from(err: SendgridError) -> Self {
        match err {
            SendgridError::NotFound { template_id, id } => StoreError::NotFound { template_id, id },
            SendgridError::Auth { message } => StoreError::Auth(message),
            other => StoreError::Sendgrid(other.to_string()),
        }
    }
}
