use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for zonewatch operations
pub type Result<T> = std::result::Result<T, ZoneError>;

/// Coarse failure classes surfaced to the presentation layer.
///
/// A single endpoint failing is an [`ErrorKind::EndpointFailure`] and only
/// removes one section from the report; the other kinds end one whole fetch
/// without touching the sibling slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// One sub-request failed; the affected field is left out
    EndpointFailure,
    /// The credential was rejected or is unusable
    AuthFailure,
    /// The domain or zone does not exist
    NotFound,
    /// A request did not finish in time
    Timeout,
    /// A DMARC record could not be parsed; only ever reported as "no record"
    ParseFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndpointFailure => write!(f, "endpoint failure"),
            Self::AuthFailure => write!(f, "auth failure"),
            Self::NotFound => write!(f, "not found"),
            Self::Timeout => write!(f, "timeout"),
            Self::ParseFailure => write!(f, "parse failure"),
        }
    }
}

/// Errors that can occur while talking to the zone API or resolving records
#[derive(Error, Debug)]
pub enum ZoneError {
    /// The API rejected the credential (HTTP 401)
    #[error("invalid token - authentication failed")]
    Unauthorized,

    /// The credential is not in the format the provider expects
    #[error("invalid token format: use an API token, not a global API key")]
    InvalidCredentialFormat,

    /// No credential was supplied
    #[error("token is empty")]
    EmptyCredential,

    /// No zone matches the requested domain
    #[error("zone not found: {domain}")]
    ZoneNotFound {
        /// Domain that was looked up
        domain: String,
    },

    /// Resource not found (HTTP 404)
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Rate limit exceeded (HTTP 429)
    #[error("rate limit exceeded")]
    RateLimited,

    /// API returned an error response or `success: false`
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code, or the provider error code for envelope failures
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ZoneError {
    /// Classify this error into the coarse taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::InvalidCredentialFormat | Self::EmptyCredential => {
                ErrorKind::AuthFailure
            }
            Self::ZoneNotFound { .. } | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout => ErrorKind::Timeout,
            Self::RateLimited
            | Self::Api { .. }
            | Self::Http(_)
            | Self::Json(_)
            | Self::Dns(_)
            | Self::Config(_) => ErrorKind::EndpointFailure,
        }
    }

    /// Returns true if the error is due to the credential
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::AuthFailure)
    }

    /// Returns the HTTP status code if one is known
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::InvalidCredentialFormat => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_are_auth_failures() {
        assert_eq!(ZoneError::Unauthorized.kind(), ErrorKind::AuthFailure);
        assert_eq!(ZoneError::InvalidCredentialFormat.kind(), ErrorKind::AuthFailure);
        assert_eq!(ZoneError::EmptyCredential.kind(), ErrorKind::AuthFailure);
        assert!(ZoneError::EmptyCredential.is_auth_error());
    }

    #[test]
    fn missing_zone_is_not_found() {
        let err = ZoneError::ZoneNotFound {
            domain: "example.com".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "zone not found: example.com");
    }

    #[test]
    fn transport_errors_are_endpoint_failures() {
        let err = ZoneError::Api {
            code: 500,
            message: "boom".into(),
        };
        assert_eq!(err.kind(), ErrorKind::EndpointFailure);
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(ZoneError::Http("reset".into()).kind(), ErrorKind::EndpointFailure);
        assert_eq!(ZoneError::Timeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn undecodable_bodies_are_endpoint_failures() {
        let err: ZoneError = serde_json::from_str::<serde_json::Value>("<html>gateway</html>")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::EndpointFailure);
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn empty_credential_message() {
        assert_eq!(ZoneError::EmptyCredential.to_string(), "token is empty");
    }
}
