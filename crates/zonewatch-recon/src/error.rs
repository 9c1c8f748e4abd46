use thiserror::Error;

/// Result type alias for reconnaissance operations
pub type ReconResult<T> = std::result::Result<T, ReconError>;

/// Errors from DNS lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// The name exists but has no records of the requested type, or does not exist
    #[error("no records found for {0}")]
    NotFound(String),

    /// Query did not complete in time
    #[error("DNS query timed out")]
    Timeout,

    /// DNS resolution error
    #[error("DNS error: {0}")]
    Dns(String),

    /// The resolver could not be created
    #[error("resolver error: {0}")]
    Resolver(String),
}

impl From<ReconError> for zonewatch_core::ZoneError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::NotFound(name) => Self::NotFound { resource: name },
            ReconError::Timeout => Self::Timeout,
            ReconError::Dns(msg) => Self::Dns(msg),
            ReconError::Resolver(msg) => Self::Config(msg),
        }
    }
}
