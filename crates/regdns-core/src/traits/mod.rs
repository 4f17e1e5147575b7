//! Core traits for the regdns system
//!
//! - [`RegistrarTransport`]: Send requests to the registrar API

pub mod transport;

pub use transport::{ApiRequest, Method, RegistrarTransport};
