//! Record reconciliation engine
//!
//! The ReconcileEngine is responsible for:
//! - Partitioning a desired record set by record type
//! - Applying the safety policy to each partition
//! - Issuing one full-replacement write per surviving type
//! - Stopping at the first failed write
//!
//! ## Architecture
//!
//! ```text
//!  desired records
//!        │
//!        ▼
//! ┌──────────────┐   per type, in RecordType::ALL order
//! │  partition   │─────────────────────────────┐
//! └──────────────┘                             │
//!                                              ▼
//!                                    ┌──────────────────┐
//!                                    │  is_disallowed?  │── yes ──▶ skip
//!                                    │  or absent?      │
//!                                    └──────────────────┘
//!                                              │ no
//!                                              ▼
//!                                    ┌──────────────────┐
//!                                    │ PUT records/{t}  │── err ──▶ return
//!                                    └──────────────────┘
//! ```
//!
//! ## Failure Semantics
//!
//! Reconciliation is not transactional. When the write for one type fails,
//! every earlier type has already been replaced remotely and every later type
//! is untouched. Each write is a full replace, so re-running with the same
//! desired set resumes safely.

pub mod partition;

pub use partition::{
    SkipReason, default_records, is_disallowed, partition, partition_by_type, skip_reason,
    user_records,
};

use crate::client::paths;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::model::{DomainRecord, RecordType};
use crate::traits::{ApiRequest, Method, RegistrarTransport};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Events emitted by the ReconcileEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Reconciliation started
    Started {
        domain: String,
        records_count: usize,
    },

    /// A type was left untouched by the safety policy
    TypeSkipped {
        domain: String,
        record_type: RecordType,
        reason: SkipReason,
    },

    /// A type's remote record set was replaced
    TypeReplaced {
        domain: String,
        record_type: RecordType,
        records_count: usize,
    },

    /// A replacement write failed; later types were not processed
    Failed {
        domain: String,
        record_type: RecordType,
        error: String,
    },

    /// Every non-skipped type was written
    Finished {
        domain: String,
        writes: usize,
    },
}

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Domain that was reconciled
    pub domain: String,
    /// Types that were replaced, with the number of records written
    pub replaced: Vec<(RecordType, usize)>,
    /// Types that were skipped, with the reason
    pub skipped: Vec<(RecordType, SkipReason)>,
}

impl ReconcileReport {
    /// Number of remote writes issued
    pub fn writes(&self) -> usize {
        self.replaced.len()
    }
}

/// Core reconciliation engine
///
/// Writes are issued strictly one after another. Two engines must not
/// reconcile the same domain at the same time; the registrar is the only
/// serialization point.
pub struct ReconcileEngine {
    /// Transport used for the replacement writes
    transport: Arc<dyn RegistrarTransport>,

    /// Send `[]` for writable types with no desired records
    write_empty_types: bool,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ReconcileEngine {
    /// Create a new engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        transport: Arc<dyn RegistrarTransport>,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            transport,
            write_empty_types: config.write_empty_types,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Make the remote record sets of `domain` match `desired`, type by type
    ///
    /// # Parameters
    ///
    /// - `customer`: Customer (shopper) id to act for, if any
    /// - `domain`: The registered domain
    /// - `desired`: The complete desired record set
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: Every non-skipped type was replaced
    /// - `Err(Error)`: The first failed write; earlier types remain applied
    pub async fn reconcile_records(
        &self,
        customer: Option<&str>,
        domain: &str,
        desired: &[DomainRecord],
    ) -> Result<ReconcileReport> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(Error::validation("domain must not be empty"));
        }

        self.emit_event(EngineEvent::Started {
            domain: domain.to_string(),
            records_count: desired.len(),
        });

        let mut report = ReconcileReport {
            domain: domain.to_string(),
            ..Default::default()
        };

        for (record_type, records) in partition_by_type(desired) {
            if let Some(reason) = skip_reason(record_type, &records, self.write_empty_types) {
                debug!(
                    "Skipping {} records for {} ({:?}, {} supplied)",
                    record_type,
                    domain,
                    reason,
                    records.len()
                );
                self.emit_event(EngineEvent::TypeSkipped {
                    domain: domain.to_string(),
                    record_type,
                    reason,
                });
                report.skipped.push((record_type, reason));
                continue;
            }

            if let Err(e) = self
                .replace_type(customer, domain, record_type, &records)
                .await
            {
                error!("Failed to replace {} records for {}: {}", record_type, domain, e);
                self.emit_event(EngineEvent::Failed {
                    domain: domain.to_string(),
                    record_type,
                    error: e.to_string(),
                });
                return Err(e);
            }

            info!(
                "Replaced {} {} record(s) for {}",
                records.len(),
                record_type,
                domain
            );
            self.emit_event(EngineEvent::TypeReplaced {
                domain: domain.to_string(),
                record_type,
                records_count: records.len(),
            });
            report.replaced.push((record_type, records.len()));
        }

        self.emit_event(EngineEvent::Finished {
            domain: domain.to_string(),
            writes: report.writes(),
        });

        Ok(report)
    }

    /// Issue the full-replacement write for one type
    async fn replace_type(
        &self,
        customer: Option<&str>,
        domain: &str,
        record_type: RecordType,
        records: &[&DomainRecord],
    ) -> Result<()> {
        let request = ApiRequest::with_json(
            Method::Put,
            paths::records_by_type(domain, record_type),
            records,
        )?;

        debug!(
            "{} {} via {}",
            request.method,
            request.path,
            self.transport.transport_name()
        );

        self.transport.execute(customer, request).await?;
        Ok(())
    }

    /// Emit an engine event
    ///
    /// # Parameters
    ///
    /// - `event`: The event to emit
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "Event channel full, dropping event. Consider increasing event_channel_capacity."
                );
            }
            // Nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Event receiver dropped, discarding event");
            }
        }
    }
}
