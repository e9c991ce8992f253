//! Error types for the cfddns system
//!
//! Every failure a sync cycle can hit is one of these variants. The engine
//! turns them into per-domain `Failed` outcomes, so they are `Clone` and
//! comparable for reporting and tests.

use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the cfddns system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Network, connection or timeout failure before a response body was read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not valid JSON or lacked an expected field
    #[error("Decode error: {0}")]
    Decode(String),

    /// The provider received the request and rejected it
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Provider message(s), one `code: message` line per reported error
        message: String,
    },

    /// The domain has no existing record to update
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public address discovery failed
    #[error("IP source error: {0}")]
    IpSource(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a "record not found" error for a domain
    pub fn not_found(domain: impl Into<String>) -> Self {
        Self::RecordNotFound(domain.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Short, stable label for the error kind (used in log fields)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Provider { .. } => "provider",
            Self::RecordNotFound(_) => "record_not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
            Self::IpSource(_) => "ip_source",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_keeps_message_lines() {
        let err = Error::provider("cloudflare", "1003: Invalid zone\n");
        let text = err.to_string();
        assert!(text.contains("cloudflare"));
        assert!(text.contains("1003: Invalid zone"));
    }

    #[test]
    fn not_found_names_the_domain() {
        let err = Error::not_found("home.example.com");
        assert_eq!(err, Error::RecordNotFound("home.example.com".to_string()));
        assert_eq!(err.to_string(), "Record not found: home.example.com");
        assert_eq!(err.kind(), "record_not_found");
    }
}
