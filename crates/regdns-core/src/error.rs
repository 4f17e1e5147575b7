//! Error types for the regdns system
//!
//! Validation failures are raised before any network call is made. Everything
//! in the transport family comes back from the registrar API (or the wire
//! between us and it) and is surfaced to the caller unchanged.

use thiserror::Error;

/// Result type alias for regdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the regdns system
#[derive(Error, Debug)]
pub enum Error {
    /// A record or request field is out of bounds or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record type outside the closed set of supported types
    #[error("Unsupported record type '{given}': type must be one of: {allowed}")]
    UnsupportedType {
        /// The token that was supplied
        given: String,
        /// Comma-separated list of supported tokens
        allowed: String,
    },

    /// Network-level failure reported by the transport
    #[error("Transport error ({transport}): {message}")]
    Transport {
        /// Transport name
        transport: String,
        /// Error message
        message: String,
    },

    /// Non-success HTTP status returned by the registrar
    #[error("HTTP error {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or summary
        message: String,
    },

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Domain or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unsupported type error naming the allowed set
    pub fn unsupported_type(given: impl Into<String>) -> Self {
        Self::UnsupportedType {
            given: given.into(),
            allowed: crate::model::RecordType::ALL
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a transport error
    pub fn transport(transport: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            transport: transport.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was raised locally, before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedType { .. })
    }

    /// Whether this error came from talking to the registrar
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Http { .. }
                | Self::Authentication(_)
                | Self::RateLimited(_)
                | Self::NotFound(_)
                | Self::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_names_allowed_set() {
        let err = Error::unsupported_type("PTR");
        let msg = err.to_string();
        assert!(msg.contains("PTR"));
        assert!(msg.contains("A, AAAA, CAA, CNAME, MX, NS, SOA, SRV, TXT"));
        assert!(err.is_validation());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_family() {
        assert!(Error::http(500, "boom").is_transport());
        assert!(Error::transport("godaddy", "connection refused").is_transport());
        assert!(Error::not_found("example.com").is_transport());
        assert!(!Error::config("missing key").is_transport());
    }
}
