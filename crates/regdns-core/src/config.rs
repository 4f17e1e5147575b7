//! Configuration types for the regdns system
//!
//! This module holds the immutable record defaults, the engine and transport
//! settings, and the typed desired-state documents that callers load once at
//! the boundary and convert into validated core values.

use crate::error::{Error, Result};
use crate::model::{
    Address, Consent, Contact, DomainPurchase, DomainRecord, RecordType, validate_data,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TTL given to registrar bootstrap records
pub const DEFAULT_TTL: u32 = 3600;

/// Priority used when none is set
pub const DEFAULT_PRIORITY: u32 = 0;

/// Weight used when none is set
pub const DEFAULT_WEIGHT: u32 = 0;

/// Port value meaning "unset"
pub const DEFAULT_PORT: u32 = 0;

/// Record name denoting the zone apex
pub const APEX: &str = "@";

/// Registrar-hosted nameservers a domain falls back to on reset
pub const DEFAULT_NAMESERVERS: [&str; 2] = ["ns53.domaincontrol.com", "ns54.domaincontrol.com"];

/// Production registrar API
pub const DEFAULT_BASE_URL: &str = "https://api.godaddy.com";

/// Registrar test environment (OTE)
pub const TEST_BASE_URL: &str = "https://api.ote-godaddy.com";

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the engine event channel
    ///
    /// When full, new events are dropped (with a warning log) rather than
    /// blocking reconciliation.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Send an empty set for writable types with no desired records
    ///
    /// Off by default: absent types are left untouched remotely. When on,
    /// every remote record of such a type is removed.
    #[serde(default)]
    pub write_empty_types: bool,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
            write_empty_types: false,
        }
    }
}

fn default_event_channel_capacity() -> usize {
    100
}

/// Registrar transport configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// API key
    pub api_key: String,

    /// API secret
    pub api_secret: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Perform reads but only log mutating requests
    #[serde(default)]
    pub dry_run: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TransportConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: default_base_url(),
            dry_run: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::config("API key cannot be empty"));
        }
        if self.api_secret.is_empty() {
            return Err(Error::config("API secret cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("api_key", &"<REDACTED>")
            .field("api_secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ttl() -> i64 {
    i64::from(DEFAULT_TTL)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::config(format!("failed to parse {}: {}", path.display(), e)))
}

fn customer_id(customer: &Option<String>) -> Option<&str> {
    customer.as_deref().map(str::trim).filter(|c| !c.is_empty())
}

/// One desired DNS record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Record name, `@` for the apex
    pub name: String,

    /// Record type token, e.g. "A" or "mx"
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record data
    pub data: String,

    #[serde(default = "default_ttl")]
    pub ttl: i64,

    #[serde(default)]
    pub priority: i64,

    #[serde(default)]
    pub weight: i64,

    /// Zero means unset
    #[serde(default)]
    pub port: i64,

    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub protocol: String,
}

impl RecordConfig {
    /// Validate into a [`DomainRecord`]
    pub fn to_record(&self) -> Result<DomainRecord> {
        let record_type: RecordType = self.record_type.parse()?;
        DomainRecord::builder(self.name.clone(), record_type, self.data.clone(), self.ttl)
            .priority(self.priority)
            .weight(self.weight)
            .port(self.port)
            .service(self.service.clone())
            .protocol(self.protocol.clone())
            .build()
    }
}

/// Desired record state for one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecordsConfig {
    /// Customer (shopper) id to act for
    #[serde(default)]
    pub customer: Option<String>,

    /// The registered domain
    pub domain: String,

    /// The complete desired record set
    #[serde(default)]
    pub records: Vec<RecordConfig>,
}

impl DomainRecordsConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref())
    }

    pub fn customer(&self) -> Option<&str> {
        customer_id(&self.customer)
    }

    /// Validate every record; the first invalid one fails the whole set
    pub fn to_records(&self) -> Result<Vec<DomainRecord>> {
        if self.domain.trim().is_empty() {
            return Err(Error::validation("domain must not be empty"));
        }
        self.records.iter().map(RecordConfig::to_record).collect()
    }
}

/// Desired nameservers for one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameserversConfig {
    #[serde(default)]
    pub customer: Option<String>,

    pub domain: String,

    pub nameservers: Vec<String>,
}

impl NameserversConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref())
    }

    pub fn customer(&self) -> Option<&str> {
        customer_id(&self.customer)
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::validation("domain must not be empty"));
        }
        if self.nameservers.is_empty() {
            return Err(Error::validation("at least one nameserver is required"));
        }
        self.nameservers
            .iter()
            .try_for_each(|ns| validate_data(RecordType::Ns, ns))
    }
}

/// Mailing address block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressConfig {
    pub line_1: String,
    pub line_2: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub state: String,
}

impl From<AddressConfig> for Address {
    fn from(c: AddressConfig) -> Self {
        Address {
            line1: c.line_1,
            line2: c.line_2,
            city: c.city,
            country: c.country,
            postal_code: c.postal_code,
            state: c.state,
        }
    }
}

/// Contact block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub address: Option<AddressConfig>,
    pub email: String,
    pub fax: String,
    pub job_title: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub organization: String,
    pub phone: String,
}

impl From<ContactConfig> for Contact {
    fn from(c: ContactConfig) -> Self {
        Contact {
            address: c.address.map(Address::from),
            email: c.email,
            fax: c.fax,
            job_title: c.job_title,
            first_name: c.first_name,
            last_name: c.last_name,
            middle_name: c.middle_name,
            organization: c.organization,
            phone: c.phone,
        }
    }
}

/// Consent block; `agreed_at` defaults to load time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentConfig {
    pub agreed_at: Option<DateTime<Utc>>,
    pub agreed_by: Option<String>,
    pub agreement_keys: Vec<String>,
}

impl From<ConsentConfig> for Consent {
    fn from(c: ConsentConfig) -> Self {
        match c.agreed_at {
            Some(agreed_at) => Consent {
                agreed_at,
                agreed_by: c.agreed_by,
                agreement_keys: c.agreement_keys,
            },
            None => Consent::now(c.agreed_by, c.agreement_keys),
        }
    }
}

/// Desired registration for one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainPurchaseConfig {
    #[serde(default)]
    pub customer: Option<String>,

    pub domain: String,

    pub years_leased: u32,

    #[serde(default)]
    pub enable_privacy: bool,

    #[serde(default)]
    pub auto_renew: bool,

    #[serde(default)]
    pub nameservers: Vec<String>,

    #[serde(default)]
    pub consent: Option<ConsentConfig>,

    #[serde(default)]
    pub admin: Option<ContactConfig>,

    #[serde(default)]
    pub billing: Option<ContactConfig>,

    #[serde(default)]
    pub registrant: Option<ContactConfig>,

    #[serde(default)]
    pub tech: Option<ContactConfig>,
}

impl DomainPurchaseConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref())
    }

    pub fn customer(&self) -> Option<&str> {
        customer_id(&self.customer)
    }

    /// Build the purchase request
    pub fn to_purchase(&self) -> Result<DomainPurchase> {
        if self.domain.trim().is_empty() {
            return Err(Error::validation("domain must not be empty"));
        }

        let mut builder = DomainPurchase::builder(self.domain.clone())
            .years_leased(self.years_leased)
            .privacy(self.enable_privacy)
            .auto_renew(self.auto_renew)
            .nameservers(self.nameservers.iter().cloned());

        if let Some(consent) = &self.consent {
            builder = builder.consent(consent.clone().into());
        }
        if let Some(contact) = &self.admin {
            builder = builder.admin(contact.clone().into());
        }
        if let Some(contact) = &self.billing {
            builder = builder.billing(contact.clone().into());
        }
        if let Some(contact) = &self.registrant {
            builder = builder.registrant(contact.clone().into());
        }
        if let Some(contact) = &self.tech {
            builder = builder.tech(contact.clone().into());
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_records_document_round_trip_into_records() {
        let file = write_temp(
            r#"{
                "customer": "  ",
                "domain": "example.com",
                "records": [
                    { "name": "@", "type": "a", "data": "192.0.2.1" },
                    { "name": "@", "type": "MX", "data": "mail.example.com", "ttl": 600, "priority": 10 },
                    { "name": "@", "type": "SRV", "data": "sip.example.com", "port": 5060,
                      "service": "_sip", "protocol": "_tcp", "weight": 5 }
                ]
            }"#,
        );

        let config = DomainRecordsConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.customer(), None);

        let records = config.to_records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].record_type(), RecordType::A);
        assert_eq!(records[0].ttl(), DEFAULT_TTL);
        assert_eq!(records[1].priority(), 10);
        assert_eq!(records[2].port(), Some(5060));
    }

    #[test]
    fn test_unknown_record_type_rejected() {
        let config = DomainRecordsConfig {
            customer: Some("42".into()),
            domain: "example.com".into(),
            records: vec![RecordConfig {
                name: "@".into(),
                record_type: "PTR".into(),
                data: "example.com".into(),
                ttl: 600,
                priority: 0,
                weight: 0,
                port: 0,
                service: String::new(),
                protocol: String::new(),
            }],
        };
        assert_eq!(config.customer(), Some("42"));
        assert!(matches!(
            config.to_records().unwrap_err(),
            Error::UnsupportedType { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = DomainRecordsConfig::from_json_file("/nonexistent/records.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_nameservers_validation() {
        let mut config = NameserversConfig {
            customer: None,
            domain: "example.com".into(),
            nameservers: vec![],
        };
        assert!(config.validate().is_err());

        config.nameservers = vec!["ns1.example.net".into()];
        assert!(config.validate().is_ok());

        config.nameservers.push("n".repeat(256));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_purchase_document() {
        let file = write_temp(
            r#"{
                "domain": "example.com",
                "years_leased": 2,
                "auto_renew": true,
                "consent": { "agreed_by": "203.0.113.7", "agreement_keys": ["DNRA"] },
                "registrant": {
                    "first_name": "Rhea",
                    "email": "rhea@example.com",
                    "address": { "line_1": "1 Main St", "country": "US" }
                }
            }"#,
        );

        let purchase = DomainPurchaseConfig::from_json_file(file.path())
            .unwrap()
            .to_purchase()
            .unwrap();
        assert_eq!(purchase.years_leased(), 2);
        assert!(purchase.auto_renew());
        assert!(!purchase.privacy());
        let registrant = purchase.registrant().unwrap();
        assert_eq!(registrant.address.as_ref().unwrap().line1, "1 Main St");
        assert_eq!(purchase.consent().unwrap().agreement_keys, ["DNRA"]);
    }

    #[test]
    fn test_transport_config_validation_and_redaction() {
        let config = TransportConfig::new("key-123", "secret-456");
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let debug = format!("{:?}", config);
        assert!(!debug.contains("key-123"));
        assert!(!debug.contains("secret-456"));

        assert!(TransportConfig::new("", "s").validate().is_err());
        assert!(
            TransportConfig::new("k", "s")
                .with_base_url("ftp://example.com")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_engine_config_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.event_channel_capacity, 100);
        assert!(!config.write_empty_types);
    }
}
