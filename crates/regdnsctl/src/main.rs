// # regdnsctl - registrar DNS control
//
// This is a THIN integration layer: it reads credentials from the
// environment, parses the command line, builds the transport and hands the
// typed input to regdns-core. Record validation, partitioning and the write
// plan all live in regdns-core.
//
// ## Configuration
//
// Credentials are read from environment variables only:
//
// - `REGDNS_API_KEY`: Registrar API key
// - `REGDNS_API_SECRET`: Registrar API secret
// - `REGDNS_BASE_URL`: API base URL (optional, defaults to production)
// - `REGDNS_CUSTOMER`: Customer (shopper) id to act for (optional)
// - `REGDNS_MODE`: `dry-run` to only log mutating requests (optional)
// - `REGDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Example
//
// ```bash
// export REGDNS_API_KEY=...
// export REGDNS_API_SECRET=...
//
// regdnsctl records list example.com
// REGDNS_MODE=dry-run regdnsctl records apply records.json
// ```

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use regdns_core::config::{TEST_BASE_URL, TransportConfig};
use regdns_provider_godaddy::GoDaddyTransport;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;
use crate::commands::Session;

/// Exit codes for different termination scenarios
///
/// - 0: Command succeeded
/// - 1: Configuration or startup error
/// - 2: Command failed
/// - 130: Interrupted (a reconciliation may be partially applied)
#[derive(Debug, Clone, Copy)]
enum RegdnsExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The command failed
    RuntimeError = 2,
    /// SIGINT received before the command finished
    Interrupted = 130,
}

impl From<RegdnsExitCode> for ExitCode {
    fn from(code: RegdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Environment configuration
struct Config {
    api_key: String,
    api_secret: String,
    base_url: Option<String>,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| {
                anyhow::anyhow!("{name} is required. Set it via: export {name}=...")
            })
        };

        Ok(Self {
            api_key: required("REGDNS_API_KEY")?,
            api_secret: required("REGDNS_API_SECRET")?,
            base_url: lookup("REGDNS_BASE_URL").filter(|s| !s.is_empty()),
            dry_run: lookup("REGDNS_MODE")
                .is_some_and(|m| m.eq_ignore_ascii_case("dry-run")),
            log_level: lookup("REGDNS_LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This checks credential presence, obvious placeholder values and the
    /// log level. URL checks are left to `TransportConfig::validate`.
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("REGDNS_API_KEY", &self.api_key),
            ("REGDNS_API_SECRET", &self.api_secret),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} cannot be empty");
            }

            // Check for obvious placeholder values (common mistake)
            let lower = value.to_lowercase();
            if lower.contains("your_key")
                || lower.contains("your_secret")
                || lower.contains("replace_me")
                || lower == "key"
                || lower == "secret"
            {
                anyhow::bail!(
                    "{name} appears to be a placeholder. \
                    Use an actual credential from the registrar's developer portal."
                );
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "REGDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Transport settings, with command-line overrides applied
    fn transport_config(&self, cli: &Cli) -> TransportConfig {
        let mut config = TransportConfig::new(self.api_key.clone(), self.api_secret.clone())
            .with_dry_run(self.dry_run || cli.dry_run);

        if cli.ote {
            config = config.with_base_url(TEST_BASE_URL);
        } else if let Some(url) = cli.base_url.as_ref().or(self.base_url.as_ref()) {
            config = config.with_base_url(url.clone());
        }
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RegdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return RegdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RegdnsExitCode::ConfigError.into();
    }

    let transport = match GoDaddyTransport::from_config(&config.transport_config(&cli)) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return RegdnsExitCode::ConfigError.into();
        }
    };

    let session = Session {
        transport: Arc::new(transport),
        customer: cli.customer.clone().filter(|c| !c.trim().is_empty()),
    };

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RegdnsExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        tokio::select! {
            result = commands::run(&session, cli.command) => match result {
                Ok(()) => RegdnsExitCode::Success,
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    RegdnsExitCode::RuntimeError
                }
            },
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Interrupted; a reconciliation in progress may be partially applied");
                RegdnsExitCode::Interrupted
            }
        }
    });

    code.into()
}
