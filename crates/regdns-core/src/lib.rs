// # regdns-core
//
// Core library for registrar-backed DNS record management.
//
// ## Architecture Overview
//
// - **model**: Validated record and domain shapes (DomainRecord, DomainPurchase)
// - **RegistrarTransport**: Trait for issuing authenticated registrar API calls
// - **ReconcileEngine**: Type-partitioned, full-replacement record reconciliation
// - **RegistrarClient**: Domain lifecycle and nameserver operations
// - **config**: Record defaults and typed desired-state documents
//
// ## Design Principles
//
// 1. **Validate at construction**: An invalid record or purchase can never be built
// 2. **Replace, never merge**: Each type's write carries its full desired set
// 3. **Sequential writes**: One request at a time, stop at the first failure
// 4. **Library-First**: The CLI is a thin wrapper over this crate

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod traits;

// Re-export core types for convenience
pub use client::RegistrarClient;
pub use config::{
    DomainPurchaseConfig, DomainRecordsConfig, EngineConfig, NameserversConfig, RecordConfig,
    TransportConfig,
};
pub use engine::{EngineEvent, ReconcileEngine, ReconcileReport, SkipReason};
pub use error::{Error, Result};
pub use model::{Domain, DomainPurchase, DomainRecord, RecordType};
pub use traits::{ApiRequest, Method, RegistrarTransport};
