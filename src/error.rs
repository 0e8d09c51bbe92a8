/// Unified error types for the Trimbook client
use thiserror::Error;

/// Main error type for the client
///
/// Every failure surfaces as a value of this type; nothing in the library
/// panics on an expected failure path. `Display` strings are suitable for
/// direct presentation to the user.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client-side validation errors (caught before any request is sent)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors (bad credentials, invalid/expired token)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authorization errors (authenticated but not permitted)
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g., duplicate registration, taken slot)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Other API errors with a server-supplied message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport failures and malformed responses
    #[error("Network error occurred")]
    Network,

    /// Token storage errors
    #[error("Token storage error: {0}")]
    TokenStorage(String),

    /// Avatar asset storage errors
    #[error("Avatar storage error: {0}")]
    AvatarStorage(String),

    /// Operation not available on the configured backend
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    /// Internal client errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Map an HTTP status and server message to the matching variant
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ClientError::Authentication(message),
            403 => ClientError::Authorization(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Api { status, message },
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(401, "bad token".into()),
            ClientError::Authentication(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, "nope".into()),
            ClientError::Authorization(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "gone".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(409, "taken".into()),
            ClientError::Conflict(_)
        ));
        assert!(matches!(
            ClientError::from_status(500, "boom".into()),
            ClientError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_display_is_user_facing() {
        let err = ClientError::Network;
        assert_eq!(err.to_string(), "Network error occurred");

        let err = ClientError::Api {
            status: 400,
            message: "Request failed".into(),
        };
        assert_eq!(err.to_string(), "Request failed");
    }
}
