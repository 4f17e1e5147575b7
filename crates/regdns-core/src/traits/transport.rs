// # Registrar Transport Trait
//
// Defines the interface used to talk to the registrar's HTTP API.
//
// ## Implementations
//
// - GoDaddy-style `/v1/domains` API: `regdns-provider-godaddy` crate
// - Test doubles in `regdns-core/tests/common`
//
// ## Usage
//
// ```rust,ignore
// use regdns_core::{ApiRequest, RegistrarTransport};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let transport = /* RegistrarTransport implementation */;
//
//     let domains = transport
//         .execute(Some("12345"), ApiRequest::get("/v1/domains"))
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// HTTP method of a registrar request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether the request changes remote state
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the registrar API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/v1/domains/example.com`
    pub path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Build a request with `body` serialized as JSON
    pub fn with_json<T: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, crate::Error> {
        Ok(Self {
            method,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

/// Trait for registrar transport implementations
///
/// A transport performs exactly one authenticated HTTP request per call and
/// decodes the response body as JSON. It owns the request timeout and the
/// mapping from HTTP status codes to [`crate::Error`] variants.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to the configured registrar only
/// - ✅ Parse registrar responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (callers re-run reconciliation instead)
/// - ❌ Reorder, batch or parallelize requests
/// - ❌ Decide which record types are safe to write (owned by the engine)
/// - ❌ Log credentials
#[async_trait]
pub trait RegistrarTransport: Send + Sync {
    /// Execute a request on behalf of `customer`
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The decoded response body, `Value::Null` when empty
    /// - `Err(Error)`: Network failure or non-success status
    async fn execute(
        &self,
        customer: Option<&str>,
        request: ApiRequest,
    ) -> Result<serde_json::Value, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
