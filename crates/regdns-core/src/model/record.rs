//! DNS record model and field validators
//!
//! A [`DomainRecord`] only leaves this module fully validated: the
//! [`DomainRecordBuilder`] checks the base fields first and then surfaces the
//! first modifier that failed, so callers never observe a half-built record.
//! Records decoded from the registrar's responses skip the builder and are
//! taken as-is.

use crate::config::{APEX, DEFAULT_PORT, DEFAULT_PRIORITY, DEFAULT_TTL, DEFAULT_WEIGHT};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_LABELS: usize = 255;
const MAX_LABEL_LEN: usize = 63;
const MAX_DATA_LEN: usize = 255;
const MAX_TXT_DATA_LEN: usize = 512;
const MAX_PRIORITY: i64 = 65535;
const MAX_WEIGHT: i64 = 100;
const MAX_PORT: i64 = 65535;

/// DNS record type
///
/// Declaration order is the order in which record sets are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    /// Address record (IPv4)
    A,
    /// Address record (IPv6)
    Aaaa,
    /// Certification authority authorization
    Caa,
    /// Canonical name (alias)
    Cname,
    /// Mail exchange
    Mx,
    /// Name server
    Ns,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
    /// Text
    Txt,
}

impl RecordType {
    /// Every supported type, in reconciliation order
    pub const ALL: [RecordType; 9] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Caa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Ns,
        RecordType::Soa,
        RecordType::Srv,
        RecordType::Txt,
    ];

    /// Canonical token used on the wire and in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Parse a type token, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| Error::unsupported_type(token))
    }
}

impl TryFrom<String> for RecordType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

/// A single DNS record as exchanged with the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    data: String,
    #[serde(default)]
    priority: u32,
    #[serde(default)]
    ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protocol: Option<String>,
    #[serde(default)]
    weight: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u32>,
}

impl DomainRecord {
    /// Start building a validated record
    pub fn builder(
        name: impl Into<String>,
        record_type: RecordType,
        data: impl Into<String>,
        ttl: i64,
    ) -> DomainRecordBuilder {
        DomainRecordBuilder::new(name, record_type, data, ttl)
    }

    /// Build a validated record without any optional modifiers
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        data: impl Into<String>,
        ttl: i64,
    ) -> Result<Self> {
        Self::builder(name, record_type, data, ttl).build()
    }

    /// Apex nameserver record with the default TTL
    pub fn ns(data: impl Into<String>) -> Result<Self> {
        Self::new(APEX, RecordType::Ns, data, i64::from(DEFAULT_TTL))
    }

    /// Apex address record with the default TTL
    pub fn a(data: impl Into<String>) -> Result<Self> {
        Self::new(APEX, RecordType::A, data, i64::from(DEFAULT_TTL))
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn port(&self) -> Option<u32> {
        self.port
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// Whether this looks like a registrar-synthesized bootstrap record
    /// (apex name, default TTL)
    pub fn is_default(&self) -> bool {
        self.name == APEX && self.ttl == DEFAULT_TTL
    }

    /// Default apex A record
    pub fn is_default_a(&self) -> bool {
        self.record_type == RecordType::A && self.is_default()
    }

    /// Default apex NS record
    pub fn is_default_ns(&self) -> bool {
        self.record_type == RecordType::Ns && self.is_default()
    }
}

/// Builder for [`DomainRecord`]
///
/// Modifiers validate their value when applied. Once one fails the remaining
/// modifiers are ignored and [`build`](Self::build) returns that error.
#[derive(Debug)]
#[must_use]
pub struct DomainRecordBuilder {
    name: String,
    record_type: RecordType,
    data: String,
    ttl: i64,
    priority: u32,
    weight: u32,
    port: Option<u32>,
    service: Option<String>,
    protocol: Option<String>,
    error: Option<Error>,
}

impl DomainRecordBuilder {
    fn new(
        name: impl Into<String>,
        record_type: RecordType,
        data: impl Into<String>,
        ttl: i64,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            record_type,
            data: data.into().trim().to_string(),
            ttl,
            priority: DEFAULT_PRIORITY,
            weight: DEFAULT_WEIGHT,
            port: None,
            service: None,
            protocol: None,
            error: None,
        }
    }

    fn apply<T>(mut self, result: Result<T>, assign: impl FnOnce(&mut Self, T)) -> Self {
        if self.error.is_some() {
            return self;
        }
        match result {
            Ok(value) => assign(&mut self, value),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Set the priority (0..=65535)
    pub fn priority(self, priority: i64) -> Self {
        self.apply(validate_priority(priority), |b, v| b.priority = v)
    }

    /// Set the weight (0..=100)
    pub fn weight(self, weight: i64) -> Self {
        self.apply(validate_weight(weight), |b, v| b.weight = v)
    }

    /// Set the port (1..=65535). Zero leaves the port unset.
    pub fn port(self, port: i64) -> Self {
        if port == i64::from(DEFAULT_PORT) {
            return self;
        }
        self.apply(validate_port(port), |b, v| b.port = Some(v))
    }

    /// Set the SRV service, e.g. `_ldap`. Empty leaves it unset.
    pub fn service(self, service: impl Into<String>) -> Self {
        let service = service.into();
        self.apply(validate_service(&service), |b, ()| {
            b.service = non_blank(service)
        })
    }

    /// Set the SRV protocol, e.g. `_tcp`. Empty leaves it unset.
    pub fn protocol(self, protocol: impl Into<String>) -> Self {
        let protocol = protocol.into();
        self.apply(validate_protocol(&protocol), |b, ()| {
            b.protocol = non_blank(protocol)
        })
    }

    /// Validate and produce the record
    pub fn build(self) -> Result<DomainRecord> {
        validate_data(self.record_type, &self.data)?;
        validate_name(&self.name)?;
        let ttl = validate_ttl(self.ttl)?;

        if let Some(err) = self.error {
            return Err(err);
        }

        Ok(DomainRecord {
            record_type: self.record_type,
            name: self.name,
            data: self.data,
            priority: self.priority,
            ttl,
            service: self.service,
            protocol: self.protocol,
            weight: self.weight,
            port: self.port,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Check a record name: 1..=255 labels, each at most 63 octets
pub fn validate_name(name: &str) -> Result<()> {
    let labels: Vec<&str> = name.split('.').collect();
    if labels.is_empty() || labels.len() > MAX_LABELS {
        return Err(Error::validation("name must be between 1..255 octets"));
    }
    if labels.iter().any(|label| label.len() > MAX_LABEL_LEN) {
        return Err(Error::validation(
            "invalid domain name. name octets should be less than 63 characters",
        ));
    }
    Ok(())
}

/// Check the data length bound for the given record type
///
/// TXT allows up to 512 octets, SRV is unconstrained, everything else is
/// capped at 255.
pub fn validate_data(record_type: RecordType, data: &str) -> Result<()> {
    match record_type {
        RecordType::Srv => Ok(()),
        RecordType::Txt if data.len() > MAX_TXT_DATA_LEN => Err(Error::validation(
            "TXT data must be between 0..512 characters in length",
        )),
        RecordType::Txt => Ok(()),
        _ if data.len() > MAX_DATA_LEN => Err(Error::validation(
            "data must be between 0..255 characters in length",
        )),
        _ => Ok(()),
    }
}

/// Check a TTL and narrow it to seconds
pub fn validate_ttl(ttl: i64) -> Result<u32> {
    u32::try_from(ttl).map_err(|_| Error::validation("ttl must be a positive value"))
}

/// Check a priority (16 bit)
pub fn validate_priority(priority: i64) -> Result<u32> {
    in_range(priority, 0, MAX_PRIORITY, "priority must be between 0..65535 (16 bit)")
}

/// Check a weight
pub fn validate_weight(weight: i64) -> Result<u32> {
    in_range(weight, 0, MAX_WEIGHT, "weight must be between 0..100")
}

/// Check a port
pub fn validate_port(port: i64) -> Result<u32> {
    in_range(port, 1, MAX_PORT, "port must be between 1..65535")
}

/// Check an SRV service label
pub fn validate_service(service: &str) -> Result<()> {
    underscore_prefixed(service, "service must start with an underscore (e.g. _ldap)")
}

/// Check an SRV protocol label
pub fn validate_protocol(protocol: &str) -> Result<()> {
    underscore_prefixed(protocol, "protocol must start with an underscore (e.g. _tcp)")
}

fn in_range(value: i64, min: i64, max: i64, msg: &str) -> Result<u32> {
    if !(min..=max).contains(&value) {
        return Err(Error::validation(msg));
    }
    u32::try_from(value).map_err(|_| Error::validation(msg))
}

fn underscore_prefixed(value: &str, msg: &str) -> Result<()> {
    if !value.trim().is_empty() && !value.starts_with('_') {
        return Err(Error::validation(msg));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t: RecordType, data: &str) -> Result<DomainRecord> {
        DomainRecord::new("www", t, data, 600)
    }

    #[test]
    fn test_type_order_is_declaration_order() {
        let tokens: Vec<&str> = RecordType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            tokens,
            ["A", "AAAA", "CAA", "CNAME", "MX", "NS", "SOA", "SRV", "TXT"]
        );
    }

    #[test]
    fn test_type_parse_ignores_case() {
        assert_eq!("cname".parse::<RecordType>().unwrap(), RecordType::Cname);
        assert_eq!("Txt".parse::<RecordType>().unwrap(), RecordType::Txt);

        let err = "PTR".parse::<RecordType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }

    #[test]
    fn test_txt_data_bounds() {
        assert!(record(RecordType::Txt, &"x".repeat(512)).is_ok());
        let err = record(RecordType::Txt, &"x".repeat(513)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_default_data_bounds() {
        for t in [RecordType::A, RecordType::Cname, RecordType::Mx, RecordType::Caa] {
            assert!(record(t, &"x".repeat(255)).is_ok(), "{t} with 255 chars");
            assert!(record(t, &"x".repeat(256)).is_err(), "{t} with 256 chars");
        }
    }

    #[test]
    fn test_srv_data_unconstrained() {
        assert!(record(RecordType::Srv, &"x".repeat(4096)).is_ok());
    }

    #[test]
    fn test_name_label_bounds() {
        let ok = format!("{}.example.com", "a".repeat(63));
        assert!(DomainRecord::new(ok, RecordType::A, "1.2.3.4", 600).is_ok());

        let too_long = format!("{}.example.com", "a".repeat(64));
        assert!(DomainRecord::new(too_long, RecordType::A, "1.2.3.4", 600).is_err());

        let too_many = vec!["a"; 256].join(".");
        assert!(DomainRecord::new(too_many, RecordType::A, "1.2.3.4", 600).is_err());
    }

    #[test]
    fn test_negative_ttl_rejected() {
        assert!(DomainRecord::new("@", RecordType::A, "1.2.3.4", -1).is_err());
        assert_eq!(
            DomainRecord::new("@", RecordType::A, "1.2.3.4", 0).unwrap().ttl(),
            0
        );
    }

    #[test]
    fn test_name_and_data_trimmed() {
        let rec = DomainRecord::new("  www ", RecordType::A, " 1.2.3.4\n", 600).unwrap();
        assert_eq!(rec.name(), "www");
        assert_eq!(rec.data(), "1.2.3.4");
    }

    #[test]
    fn test_port_zero_is_unset() {
        let rec = DomainRecord::builder("_sip._tcp", RecordType::Srv, "sip.example.com", 600)
            .port(0)
            .build()
            .unwrap();
        assert_eq!(rec.port(), None);

        assert!(
            DomainRecord::builder("_sip._tcp", RecordType::Srv, "sip.example.com", 600)
                .port(65536)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_service_and_protocol_prefix() {
        let build = |service: &str| {
            DomainRecord::builder("@", RecordType::Srv, "ldap.example.com", 600)
                .service(service)
                .build()
        };
        assert!(build("ldap").is_err());
        assert_eq!(build("_ldap").unwrap().service(), Some("_ldap"));
        assert_eq!(build("").unwrap().service(), None);

        let err = DomainRecord::builder("@", RecordType::Srv, "ldap.example.com", 600)
            .protocol("tcp")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("protocol"));
    }

    #[test]
    fn test_first_failing_modifier_wins() {
        let err = DomainRecord::builder("@", RecordType::Mx, "mail.example.com", 600)
            .priority(70000)
            .weight(500)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("priority"));
    }

    #[test]
    fn test_modifiers_applied() {
        let rec = DomainRecord::builder("_sip._tcp", RecordType::Srv, "sip.example.com", 600)
            .priority(10)
            .weight(60)
            .port(5060)
            .service("_sip")
            .protocol("_tcp")
            .build()
            .unwrap();
        assert_eq!(rec.priority(), 10);
        assert_eq!(rec.weight(), 60);
        assert_eq!(rec.port(), Some(5060));
        assert_eq!(rec.protocol(), Some("_tcp"));
    }

    #[test]
    fn test_standalone_validators() {
        assert!(validate_priority(65535).is_ok());
        assert!(validate_priority(-1).is_err());
        assert!(validate_weight(100).is_ok());
        assert!(validate_weight(101).is_err());
        assert!(validate_port(1).is_ok());
        assert!(validate_port(0).is_err());
        assert!(validate_data(RecordType::Ns, "ns1.example.com").is_ok());
    }

    #[test]
    fn test_default_records() {
        let a = DomainRecord::a("1.2.3.4").unwrap();
        let ns = DomainRecord::ns("ns1.example.com").unwrap();
        assert!(a.is_default_a());
        assert!(!a.is_default_ns());
        assert!(ns.is_default_ns());

        let custom = DomainRecord::new("@", RecordType::A, "1.2.3.4", 600).unwrap();
        assert!(!custom.is_default());
    }

    #[test]
    fn test_wire_shape() {
        let rec = DomainRecord::builder("www", RecordType::Cname, "@", 600)
            .build()
            .unwrap();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "CNAME",
                "name": "www",
                "data": "@",
                "priority": 0,
                "ttl": 600,
                "weight": 0
            })
        );

        let decoded: DomainRecord = serde_json::from_value(serde_json::json!({
            "type": "srv",
            "name": "_sip._tcp",
            "data": "sip.example.com",
            "ttl": 3600,
            "port": 5060,
            "service": "_sip",
            "protocol": "_tcp"
        }))
        .unwrap();
        assert_eq!(decoded.record_type(), RecordType::Srv);
        assert_eq!(decoded.port(), Some(5060));
    }
}
