// # GoDaddy Registrar Transport
//
// This crate provides the HTTP transport that regdns-core uses to talk to the
// GoDaddy domains API.
//
// ## Behavior
//
// - One HTTP request per `execute` call
// - Full error propagation to the caller (no retry, no backoff)
// - HTTP timeout configured (30 seconds by default)
// - Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - Dry-run mode for safe testing
//
// ## Trust Level: Untrusted (Transport)
//
// The transport only performs HTTP calls to its configured endpoint and
// decodes responses. It does not spawn tasks, retry, cache, or decide what
// to write; request assembly and ordering belong to regdns-core.
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or `Debug` output
// - Credentials are supplied through `TransportConfig` (environment only in regdnsctl)
// - Construction fails fast if either credential is empty
//
// ## API Reference
//
// - Authorization: `sso-key {key}:{secret}`
// - Acting for another customer: `X-Shopper-Id: {customer}`
// - Replace records of one type: PUT `/v1/domains/{domain}/records/{type}`

use async_trait::async_trait;
use regdns_core::config::{DEFAULT_BASE_URL, TEST_BASE_URL, TransportConfig};
use regdns_core::traits::{ApiRequest, Method, RegistrarTransport};
use regdns_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Production API base URL
pub const PRODUCTION_BASE_URL: &str = DEFAULT_BASE_URL;

/// OTE (test environment) API base URL
pub const OTE_BASE_URL: &str = TEST_BASE_URL;

/// Environment variable that switches the transport to dry-run
pub const MODE_ENV: &str = "REGDNS_MODE";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Name reported in errors and logs
const TRANSPORT_NAME: &str = "godaddy";

/// GoDaddy registrar transport
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the transport will:
/// - Perform all GET requests
/// - Log the intended method, path and payload of every other request
/// - **NOT** send them, answering `null` instead
///
/// # Security
///
/// The Debug implementation does not expose the credentials.
pub struct GoDaddyTransport {
    /// API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API secret
    /// ⚠️ NEVER log this value
    api_secret: String,

    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip mutating ones
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GoDaddyTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyTransport")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GoDaddyTransport {
    /// Create a new transport
    ///
    /// # Parameters
    ///
    /// - `api_key` / `api_secret`: Registrar API credentials
    /// - `base_url`: API root, e.g. [`PRODUCTION_BASE_URL`]
    /// - `dry_run`: If true, perform GET requests but skip mutating ones
    ///
    /// # Errors
    ///
    /// `Error::Config` when a credential is empty or the HTTP client cannot
    /// be built.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        Self::with_timeout(api_key, api_secret, base_url, dry_run, DEFAULT_HTTP_TIMEOUT)
    }

    fn with_timeout(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: impl Into<String>,
        dry_run: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.is_empty() || api_secret.is_empty() {
            return Err(Error::config("GoDaddy API key and secret cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_secret,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a transport against production in live mode
    pub fn new_live(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::new(api_key, api_secret, PRODUCTION_BASE_URL, false)
    }

    /// Create a transport against production in dry-run mode
    pub fn new_dry_run(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::new(api_key, api_secret, PRODUCTION_BASE_URL, true)
    }

    /// Create a transport from configuration
    ///
    /// Dry-run is on when either the config asks for it or `REGDNS_MODE`
    /// is `dry-run`.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        config.validate()?;

        let dry_run = config.dry_run
            || std::env::var(MODE_ENV).unwrap_or_default().to_lowercase() == "dry-run";

        if dry_run {
            tracing::warn!("GoDaddy transport running in DRY-RUN mode - no changes will be made");
        }

        Self::with_timeout(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.base_url.clone(),
            dry_run,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether mutating requests are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorization(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }
}

/// Map a non-success status and its body to the error family
fn status_error(status: reqwest::StatusCode, body: &str, request: &ApiRequest) -> Error {
    let detail = registrar_message(body);
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Authentication failed: invalid API key/secret or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{} {}: {}", request.method, request.path, detail)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::http(
            status.as_u16(),
            format!("GoDaddy server error (transient): {}", detail),
        ),
        code => Error::http(
            code,
            format!("{} {} failed: {}", request.method, request.path, detail),
        ),
    }
}

/// Prefer the registrar's `message` field; fall back to the raw body
fn registrar_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl RegistrarTransport for GoDaddyTransport {
    /// Send one request
    ///
    /// # API Call
    ///
    /// ```http
    /// {METHOD} {base_url}{path}
    /// Authorization: sso-key <key>:<secret>
    /// X-Shopper-Id: <customer>        (only when a customer is given)
    /// Content-Type: application/json
    /// ```
    async fn execute(&self, customer: Option<&str>, request: ApiRequest) -> Result<Value> {
        let url = self.url(&request.path);

        if self.dry_run && request.method.is_mutating() {
            let payload = request.body.clone().unwrap_or_default();
            tracing::info!(
                "[DRY-RUN] Would send {} request to {} with payload: {}",
                request.method,
                url,
                payload
            );
            return Ok(Value::Null);
        }

        tracing::debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        }
        .header("Authorization", self.authorization())
        .header("Accept", "application/json");

        if let Some(customer) = customer.map(str::trim).filter(|c| !c.is_empty()) {
            builder = builder.header("X-Shopper-Id", customer);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport(TRANSPORT_NAME, format!("HTTP request failed: {}", e))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::transport(TRANSPORT_NAME, format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(status_error(status, &text, &request));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::transport(TRANSPORT_NAME, format!("Failed to parse response: {}", e))
        })
    }

    fn transport_name(&self) -> &'static str {
        TRANSPORT_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(GoDaddyTransport::new_live("", "secret").is_err());
        assert!(GoDaddyTransport::new_live("key", "").is_err());
    }

    #[test]
    fn test_dry_run_mode() {
        let transport_dry = GoDaddyTransport::new_dry_run("key", "secret").unwrap();
        let transport_live = GoDaddyTransport::new_live("key", "secret").unwrap();

        assert!(transport_dry.is_dry_run());
        assert!(!transport_live.is_dry_run());
    }

    #[test]
    fn test_from_config() {
        let config = TransportConfig::new("key", "secret")
            .with_base_url("https://api.ote-godaddy.com/")
            .with_dry_run(true);
        let transport = GoDaddyTransport::from_config(&config).unwrap();

        assert!(transport.is_dry_run());
        assert_eq!(
            transport.url("/v1/domains"),
            "https://api.ote-godaddy.com/v1/domains"
        );
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = TransportConfig::new("key", "");
        assert!(GoDaddyTransport::from_config(&config).is_err());
    }

    #[test]
    fn test_transport_name() {
        let transport = GoDaddyTransport::new_live("key", "secret").unwrap();
        assert_eq!(transport.transport_name(), "godaddy");
    }

    #[test]
    fn test_authorization_header_format() {
        let transport = GoDaddyTransport::new_live("abc", "xyz").unwrap();
        assert_eq!(transport.authorization(), "sso-key abc:xyz");
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let transport = GoDaddyTransport::new_live("key_12345", "secret_67890").unwrap();

        let debug_str = format!("{:?}", transport);
        assert!(!debug_str.contains("key_12345"));
        assert!(!debug_str.contains("secret_67890"));
        assert!(debug_str.contains("GoDaddyTransport"));
    }

    #[test]
    fn test_status_mapping() {
        let request = ApiRequest::get("/v1/domains/example.com");
        let err = |code: u16, body: &str| {
            status_error(reqwest::StatusCode::from_u16(code).unwrap(), body, &request)
        };

        assert!(matches!(err(401, ""), Error::Authentication(_)));
        assert!(matches!(err(403, ""), Error::Authentication(_)));
        assert!(matches!(err(404, ""), Error::NotFound(_)));
        assert!(matches!(err(429, ""), Error::RateLimited(_)));
        assert!(matches!(err(503, ""), Error::Http { status: 503, .. }));
        assert!(matches!(err(422, ""), Error::Http { status: 422, .. }));
    }

    #[test]
    fn test_registrar_message_extracted() {
        assert_eq!(
            registrar_message(r#"{"code":"INVALID_BODY","message":"Request body is invalid"}"#),
            "Request body is invalid"
        );
        assert_eq!(registrar_message("plain text"), "plain text");
    }
}
