//! Error taxonomy of the master-data engine.
//!
//! Every engine operation returns `Result<_, CoreError>`. Components turn the
//! error into an inline banner via [`CoreError::user_message`].

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No session token available.
    #[error("not authenticated")]
    AuthMissing,
    /// Server answered 401: the stored session is no longer valid.
    #[error("session expired")]
    Unauthorized,
    /// The effective capability for this action is false.
    #[error("permission denied")]
    PermissionDenied,
    /// Request could not be sent or its body could not be read.
    #[error("network error: {0}")]
    Network(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    /// Payload did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    ValidationShapeMismatch(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthMissing => "You are not signed in. Please log in again.".to_string(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::PermissionDenied => "You do not have permission for this action.".to_string(),
            Self::Network(e) => format!("Could not reach the server: {e}"),
            Self::Server { status, message } if message.trim().is_empty() => {
                format!("Server error ({status})")
            }
            Self::Server { status, message } => format!("Server error ({status}): {message}"),
            Self::ValidationShapeMismatch(e) => format!("Unexpected data from server: {e}"),
        }
    }

    /// True when the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::AuthMissing | Self::Unauthorized)
    }
}
