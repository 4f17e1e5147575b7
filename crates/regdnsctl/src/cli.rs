//! Command-line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Manage registrar DNS records and domain registrations
#[derive(Parser, Debug)]
#[command(name = "regdnsctl", version, about)]
pub struct Cli {
    /// Customer (shopper) id to act for
    #[arg(short, long, global = true, env = "REGDNS_CUSTOMER")]
    pub customer: Option<String>,

    /// Perform reads but only log mutating requests
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use the registrar's test environment (OTE)
    #[arg(long, global = true, conflicts_with = "base_url")]
    pub ote: bool,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// DNS records of a domain
    Records(RecordsArgs),

    /// Nameservers of a domain
    Nameservers(NameserversArgs),

    /// Domain registrations
    Domain(DomainArgs),
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// Print the records currently published for a domain
    List {
        domain: String,

        /// Hide registrar bootstrap records (apex A/NS with the default TTL)
        #[arg(long)]
        user_only: bool,
    },

    /// Replace the remote records with a desired-state JSON document
    Apply {
        /// Path to the records document
        file: PathBuf,

        /// Clear types that have no records in the document
        #[arg(long)]
        clear_absent: bool,
    },
}

#[derive(Args, Debug)]
pub struct NameserversArgs {
    #[command(subcommand)]
    pub command: NameserversCommand,
}

#[derive(Subcommand, Debug)]
pub enum NameserversCommand {
    /// Point a domain at the given nameservers
    Set {
        domain: String,

        #[arg(required = true)]
        nameservers: Vec<String>,
    },

    /// Apply a nameservers JSON document
    Apply { file: PathBuf },

    /// Point a domain back at the registrar's nameservers
    Reset { domain: String },
}

#[derive(Args, Debug)]
pub struct DomainArgs {
    #[command(subcommand)]
    pub command: DomainCommand,
}

#[derive(Subcommand, Debug)]
pub enum DomainCommand {
    /// List every domain of the customer
    List,

    /// Show one domain
    Show { domain: String },

    /// Purchase a domain described by a JSON document
    Purchase {
        file: PathBuf,

        /// Only ask the registrar whether the purchase would be accepted
        #[arg(long)]
        validate_only: bool,
    },

    /// Cancel a domain
    Cancel { domain: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_records_apply_parses() {
        let cli = Cli::try_parse_from([
            "regdnsctl",
            "--dry-run",
            "records",
            "apply",
            "records.json",
            "--clear-absent",
        ])
        .unwrap();

        assert!(cli.dry_run);
        match cli.command {
            Command::Records(RecordsArgs {
                command: RecordsCommand::Apply { file, clear_absent },
            }) => {
                assert_eq!(file, PathBuf::from("records.json"));
                assert!(clear_absent);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_nameservers_set_requires_at_least_one() {
        assert!(
            Cli::try_parse_from(["regdnsctl", "nameservers", "set", "example.com"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "regdnsctl",
                "nameservers",
                "set",
                "example.com",
                "ns1.example.net"
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_ote_conflicts_with_base_url() {
        assert!(
            Cli::try_parse_from([
                "regdnsctl",
                "--ote",
                "--base-url",
                "https://example.test",
                "domain",
                "list"
            ])
            .is_err()
        );
    }
}
