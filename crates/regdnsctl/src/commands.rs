//! Subcommand handlers
//!
//! Each handler loads its typed input once, hands it to regdns-core and
//! prints the result. No record or domain logic lives here.

use crate::cli::{Command, DomainCommand, NameserversCommand, RecordsCommand};
use anyhow::{Context, Result};
use regdns_core::engine::{EngineEvent, user_records};
use regdns_core::{
    DomainPurchaseConfig, DomainRecordsConfig, EngineConfig, NameserversConfig, ReconcileEngine,
    RegistrarClient, RegistrarTransport,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Execution context shared by every handler
pub struct Session {
    pub transport: Arc<dyn RegistrarTransport>,
    pub customer: Option<String>,
}

impl Session {
    fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    fn client(&self) -> RegistrarClient {
        RegistrarClient::new(Arc::clone(&self.transport))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Dispatch one subcommand
pub async fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Records(args) => match args.command {
            RecordsCommand::List { domain, user_only } => {
                list_records(session, &domain, user_only).await
            }
            RecordsCommand::Apply { file, clear_absent } => {
                apply_records(session, &file, clear_absent).await
            }
        },
        Command::Nameservers(args) => match args.command {
            NameserversCommand::Set {
                domain,
                nameservers,
            } => set_nameservers(session, session.customer(), &domain, &nameservers).await,
            NameserversCommand::Apply { file } => apply_nameservers(session, &file).await,
            NameserversCommand::Reset { domain } => {
                let id = session
                    .client()
                    .reset_nameservers(session.customer(), &domain)
                    .await?;
                println!("{domain} (id {id}) reset to registrar nameservers");
                Ok(())
            }
        },
        Command::Domain(args) => match args.command {
            DomainCommand::List => {
                print_json(&session.client().get_domains(session.customer()).await?)
            }
            DomainCommand::Show { domain } => {
                print_json(&session.client().get_domain(session.customer(), &domain).await?)
            }
            DomainCommand::Purchase {
                file,
                validate_only,
            } => purchase_domain(session, &file, validate_only).await,
            DomainCommand::Cancel { domain } => {
                session
                    .client()
                    .cancel_domain(session.customer(), &domain)
                    .await?;
                println!("{domain} cancelled");
                Ok(())
            }
        },
    }
}

async fn list_records(session: &Session, domain: &str, user_only: bool) -> Result<()> {
    let records = session
        .client()
        .get_domain_records(session.customer(), domain)
        .await?;

    if user_only {
        print_json(&user_records(&records))
    } else {
        print_json(&records)
    }
}

async fn apply_records(session: &Session, file: &Path, clear_absent: bool) -> Result<()> {
    let document = DomainRecordsConfig::from_json_file(file)?;
    let desired = document
        .to_records()
        .with_context(|| format!("invalid record in {}", file.display()))?;

    let config = EngineConfig {
        write_empty_types: clear_absent,
        ..EngineConfig::default()
    };
    let (engine, events) = ReconcileEngine::new(Arc::clone(&session.transport), config)?;
    let logger = tokio::spawn(log_events(events));

    let customer = document.customer().or(session.customer());
    let outcome = engine
        .reconcile_records(customer, &document.domain, &desired)
        .await;

    // Closing the sender lets the logger drain and finish
    drop(engine);
    if let Err(e) = logger.await {
        warn!("Event logger stopped abnormally: {}", e);
    }

    let report = outcome.context(
        "reconciliation stopped part-way; earlier types are applied, re-run to resume",
    )?;

    for (record_type, count) in &report.replaced {
        println!("replaced {record_type:<5} {count} record(s)");
    }
    for (record_type, reason) in &report.skipped {
        println!("skipped  {record_type:<5} {reason:?}");
    }
    Ok(())
}

async fn log_events(mut events: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Started {
                domain,
                records_count,
            } => info!("Reconciling {} desired record(s) for {}", records_count, domain),
            EngineEvent::Finished { domain, writes } => {
                info!("Reconciled {} with {} write(s)", domain, writes)
            }
            other => debug!("{:?}", other),
        }
    }
}

async fn set_nameservers(
    session: &Session,
    customer: Option<&str>,
    domain: &str,
    nameservers: &[String],
) -> Result<()> {
    let id = session
        .client()
        .set_nameservers(customer, domain, nameservers)
        .await?;
    println!("{domain} (id {id}) now uses {}", nameservers.join(", "));
    Ok(())
}

async fn apply_nameservers(session: &Session, file: &Path) -> Result<()> {
    let document = NameserversConfig::from_json_file(file)?;
    document.validate()?;
    let customer = document.customer().or(session.customer());
    set_nameservers(session, customer, &document.domain, &document.nameservers).await
}

async fn purchase_domain(session: &Session, file: &Path, validate_only: bool) -> Result<()> {
    let document = DomainPurchaseConfig::from_json_file(file)?;
    let purchase = document.to_purchase()?;
    let customer = document.customer().or(session.customer());
    let client = session.client();

    client.validate_purchase(customer, &purchase).await?;
    if validate_only {
        println!("{} can be purchased", purchase.domain());
        return Ok(());
    }

    match client.purchase_domain(customer, &purchase).await? {
        Some(receipt) => print_json(&receipt),
        None => {
            println!("{}: no receipt returned, nothing was purchased", purchase.domain());
            Ok(())
        }
    }
}
