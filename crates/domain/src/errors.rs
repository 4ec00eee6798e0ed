use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid resolver endpoint: {0}")]
    InvalidResolver(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Query to {server} timed out")]
    TransportTimeout { server: String },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Errors worth another attempt against the same resolver.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::IoError(_)
        )
    }
}
