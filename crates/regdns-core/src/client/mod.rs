//! Registrar client operations
//!
//! Request assembly for the domain lifecycle calls that sit next to record
//! reconciliation: reading domains and records, purchase, update, cancel and
//! nameserver management. Each method issues its requests through the
//! [`RegistrarTransport`] one at a time and decodes the typed response.

pub mod paths;

use crate::config::DEFAULT_NAMESERVERS;
use crate::error::Result;
use crate::model::{Domain, DomainPurchase, DomainPurchaseReceipt, DomainRecord};
use crate::traits::{ApiRequest, Method, RegistrarTransport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Typed client for the registrar's domain API
#[derive(Clone)]
pub struct RegistrarClient {
    transport: Arc<dyn RegistrarTransport>,
}

impl RegistrarClient {
    pub fn new(transport: Arc<dyn RegistrarTransport>) -> Self {
        Self { transport }
    }

    /// The transport this client sends through
    pub fn transport(&self) -> Arc<dyn RegistrarTransport> {
        Arc::clone(&self.transport)
    }

    async fn send(&self, customer: Option<&str>, request: ApiRequest) -> Result<serde_json::Value> {
        debug!(
            "{} {} via {}",
            request.method,
            request.path,
            self.transport.transport_name()
        );
        self.transport.execute(customer, request).await
    }

    async fn fetch<T: DeserializeOwned>(&self, customer: Option<&str>, path: String) -> Result<T> {
        let value = self.send(customer, ApiRequest::get(path)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// List every domain owned by `customer`
    pub async fn get_domains(&self, customer: Option<&str>) -> Result<Vec<Domain>> {
        self.fetch(customer, paths::domains()).await
    }

    /// Fetch one domain
    pub async fn get_domain(&self, customer: Option<&str>, domain: &str) -> Result<Domain> {
        self.fetch(customer, paths::domain(domain)).await
    }

    /// Fetch every record currently published for `domain`
    pub async fn get_domain_records(
        &self,
        customer: Option<&str>,
        domain: &str,
    ) -> Result<Vec<DomainRecord>> {
        let value = self
            .send(customer, ApiRequest::get(paths::records(domain)))
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Purchase a domain
    ///
    /// Returns `None` when the transport answered with an empty body, which
    /// is what a dry-run transport does for every mutating request.
    pub async fn purchase_domain(
        &self,
        customer: Option<&str>,
        purchase: &DomainPurchase,
    ) -> Result<Option<DomainPurchaseReceipt>> {
        info!("Purchasing {}", purchase.domain());
        let request = ApiRequest::with_json(Method::Post, paths::purchase(), purchase)?;
        let value = self.send(customer, request).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Ask the registrar whether `purchase` would be accepted
    pub async fn validate_purchase(
        &self,
        customer: Option<&str>,
        purchase: &DomainPurchase,
    ) -> Result<()> {
        let request = ApiRequest::with_json(Method::Post, paths::domains(), purchase)?;
        self.send(customer, request).await?;
        Ok(())
    }

    /// Patch an existing domain with the populated fields of `update`
    pub async fn update_domain(
        &self,
        customer: Option<&str>,
        domain: &str,
        update: &DomainPurchase,
    ) -> Result<()> {
        info!("Updating {}", domain);
        let request = ApiRequest::with_json(Method::Patch, paths::domain(domain), update)?;
        self.send(customer, request).await?;
        Ok(())
    }

    /// Cancel a domain
    pub async fn cancel_domain(&self, customer: Option<&str>, domain: &str) -> Result<()> {
        info!("Canceling domain {}", domain);
        self.send(customer, ApiRequest::delete(paths::domain(domain)))
            .await?;
        Ok(())
    }

    /// Point `domain` at `name_servers`
    ///
    /// The domain is looked up first so a missing domain fails before any
    /// write. Returns the registrar's domain id.
    pub async fn set_nameservers(
        &self,
        customer: Option<&str>,
        domain: &str,
        name_servers: &[String],
    ) -> Result<i64> {
        let update = DomainPurchase::nameserver_update(name_servers.iter().cloned())?;
        let existing = self.get_domain(customer, domain).await?;

        info!("Setting nameservers for {}", domain);
        self.update_domain(customer, domain, &update).await?;
        Ok(existing.id)
    }

    /// Point `domain` back at the registrar's own nameservers
    pub async fn reset_nameservers(&self, customer: Option<&str>, domain: &str) -> Result<i64> {
        let defaults: Vec<String> = DEFAULT_NAMESERVERS.iter().map(|s| s.to_string()).collect();
        info!("Resetting nameservers for {}", domain);
        self.set_nameservers(customer, domain, &defaults).await
    }
}
