//! Record and domain data shapes
//!
//! - [`DomainRecord`]: a validated DNS record and its field validators
//! - [`DomainPurchase`]: purchase/update request built from optional parts
//! - [`Domain`]: the registrar's view of a registered domain

pub mod domain;
pub mod record;

pub use domain::{
    Address, Consent, Contact, Domain, DomainPurchase, DomainPurchaseBuilder,
    DomainPurchaseReceipt, DomainStatus,
};
pub use record::{
    DomainRecord, DomainRecordBuilder, RecordType, validate_data, validate_name, validate_port,
    validate_priority, validate_protocol, validate_service, validate_ttl, validate_weight,
};
