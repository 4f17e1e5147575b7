//! Domain registration shapes
//!
//! [`Domain`] is what the registrar reports back. [`DomainPurchase`] is the
//! write-only request used both to buy a domain and, with only its
//! nameservers filled in, to patch an existing one.

use crate::error::Result;
use crate::model::record::{RecordType, validate_data};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mailing address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "address1", default, skip_serializing_if = "String::is_empty")]
    pub line1: String,
    #[serde(rename = "address2", default, skip_serializing_if = "String::is_empty")]
    pub line2: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(rename = "postalCode", default, skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// Registration contact for one of the four roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "addressMailing", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fax: String,
    #[serde(rename = "jobTitle", default, skip_serializing_if = "String::is_empty")]
    pub job_title: String,
    #[serde(rename = "nameFirst", default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(rename = "nameLast", default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(rename = "nameMiddle", default, skip_serializing_if = "String::is_empty")]
    pub middle_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

/// Agreement to the registrar's terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    #[serde(rename = "agreedAt")]
    pub agreed_at: DateTime<Utc>,
    #[serde(rename = "agreedBy", default, skip_serializing_if = "Option::is_none")]
    pub agreed_by: Option<String>,
    #[serde(rename = "agreementKeys", default, skip_serializing_if = "Vec::is_empty")]
    pub agreement_keys: Vec<String>,
}

impl Consent {
    /// Consent given now by `agreed_by` (usually the client IP)
    pub fn now(agreed_by: Option<String>, agreement_keys: Vec<String>) -> Self {
        Self {
            agreed_at: Utc::now(),
            agreed_by,
            agreement_keys,
        }
    }
}

/// Registration status as reported by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DomainStatus {
    Active,
    Cancelled,
    /// Any other registrar status, kept verbatim
    Other(String),
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Active => f.write_str("ACTIVE"),
            DomainStatus::Cancelled => f.write_str("CANCELLED"),
            DomainStatus::Other(s) => f.write_str(s),
        }
    }
}

impl From<String> for DomainStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACTIVE" => DomainStatus::Active,
            "CANCELLED" => DomainStatus::Cancelled,
            _ => DomainStatus::Other(s),
        }
    }
}

impl From<DomainStatus> for String {
    fn from(status: DomainStatus) -> Self {
        status.to_string()
    }
}

/// A registered domain, owned by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(rename = "domainId")]
    pub id: i64,
    #[serde(rename = "domain")]
    pub name: String,
    pub status: DomainStatus,
    #[serde(rename = "contactAdmin", default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<Contact>,
    #[serde(rename = "contactBilling", default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<Contact>,
    #[serde(rename = "contactRegistrant", default, skip_serializing_if = "Option::is_none")]
    pub registrant: Option<Contact>,
    #[serde(rename = "contactTech", default, skip_serializing_if = "Option::is_none")]
    pub tech: Option<Contact>,
    #[serde(rename = "nameServers", alias = "nameservers", default)]
    pub name_servers: Vec<String>,
    #[serde(rename = "period", default)]
    pub years_leased: u32,
    #[serde(rename = "privacy", default)]
    pub privacy: bool,
    #[serde(rename = "renewAuto", default)]
    pub auto_renew: bool,
}

impl Domain {
    pub fn is_active(&self) -> bool {
        self.status == DomainStatus::Active
    }
}

/// Receipt returned by a successful purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPurchaseReceipt {
    pub currency: String,
    #[serde(rename = "itemCount")]
    pub item_count: u32,
    #[serde(rename = "orderId")]
    pub order_id: i64,
    pub total: i64,
}

/// Purchase (or update) request for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainPurchase {
    #[serde(skip_serializing_if = "Option::is_none")]
    consent: Option<Consent>,
    #[serde(rename = "contactAdmin", skip_serializing_if = "Option::is_none")]
    admin: Option<Contact>,
    #[serde(rename = "contactBilling", skip_serializing_if = "Option::is_none")]
    billing: Option<Contact>,
    #[serde(rename = "contactRegistrant", skip_serializing_if = "Option::is_none")]
    registrant: Option<Contact>,
    #[serde(rename = "contactTech", skip_serializing_if = "Option::is_none")]
    tech: Option<Contact>,
    #[serde(skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(rename = "nameServers")]
    name_servers: Vec<String>,
    #[serde(rename = "period", skip_serializing_if = "is_zero")]
    years_leased: u32,
    #[serde(rename = "privacy", skip_serializing_if = "is_false")]
    privacy: bool,
    #[serde(rename = "renewAuto", skip_serializing_if = "is_false")]
    auto_renew: bool,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl DomainPurchase {
    /// Start a purchase request for `domain`
    pub fn builder(domain: impl Into<String>) -> DomainPurchaseBuilder {
        DomainPurchaseBuilder::new(domain)
    }

    /// Update body that only carries a nameserver list
    pub fn nameserver_update<I, S>(name_servers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder("").nameservers(name_servers).build()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn consent(&self) -> Option<&Consent> {
        self.consent.as_ref()
    }

    pub fn admin(&self) -> Option<&Contact> {
        self.admin.as_ref()
    }

    pub fn billing(&self) -> Option<&Contact> {
        self.billing.as_ref()
    }

    pub fn registrant(&self) -> Option<&Contact> {
        self.registrant.as_ref()
    }

    pub fn tech(&self) -> Option<&Contact> {
        self.tech.as_ref()
    }

    pub fn name_servers(&self) -> &[String] {
        &self.name_servers
    }

    pub fn years_leased(&self) -> u32 {
        self.years_leased
    }

    pub fn privacy(&self) -> bool {
        self.privacy
    }

    pub fn auto_renew(&self) -> bool {
        self.auto_renew
    }
}

/// Builder for [`DomainPurchase`]
///
/// Setters apply in call order and a later call for the same field replaces
/// the earlier one. Only the nameserver setter can fail.
#[derive(Debug)]
#[must_use]
pub struct DomainPurchaseBuilder {
    purchase: DomainPurchase,
    error: Option<crate::Error>,
}

impl DomainPurchaseBuilder {
    fn new(domain: impl Into<String>) -> Self {
        Self {
            purchase: DomainPurchase {
                consent: None,
                admin: None,
                billing: None,
                registrant: None,
                tech: None,
                domain: domain.into().trim().to_string(),
                name_servers: Vec::new(),
                years_leased: 0,
                privacy: false,
                auto_renew: false,
            },
            error: None,
        }
    }

    pub fn consent(mut self, consent: Consent) -> Self {
        self.purchase.consent = Some(consent);
        self
    }

    pub fn admin(mut self, contact: Contact) -> Self {
        self.purchase.admin = Some(contact);
        self
    }

    pub fn billing(mut self, contact: Contact) -> Self {
        self.purchase.billing = Some(contact);
        self
    }

    pub fn registrant(mut self, contact: Contact) -> Self {
        self.purchase.registrant = Some(contact);
        self
    }

    pub fn tech(mut self, contact: Contact) -> Self {
        self.purchase.tech = Some(contact);
        self
    }

    /// Set the nameservers; each entry must be valid NS record data
    pub fn nameservers<I, S>(mut self, name_servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.error.is_some() {
            return self;
        }
        let name_servers: Vec<String> = name_servers.into_iter().map(Into::into).collect();
        match name_servers
            .iter()
            .try_for_each(|ns| validate_data(RecordType::Ns, ns))
        {
            Ok(()) => self.purchase.name_servers = name_servers,
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn years_leased(mut self, years: u32) -> Self {
        self.purchase.years_leased = years;
        self
    }

    pub fn privacy(mut self, privacy: bool) -> Self {
        self.purchase.privacy = privacy;
        self
    }

    pub fn auto_renew(mut self, auto_renew: bool) -> Self {
        self.purchase.auto_renew = auto_renew;
        self
    }

    pub fn build(self) -> Result<DomainPurchase> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.purchase),
        }
    }
}
