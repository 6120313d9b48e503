//! RouteIQ command line.
//!
//! Classifies ticket text and, given a catalog snapshot exported from the
//! ticketing backend, prints the routing decision as JSON on stdout. Logs go
//! to stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use routeiq::config::RouteIqConfig;
use routeiq::{CatalogSnapshot, Router, TicketText, Vendor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "routeiq", version, about = "Classify and route support tickets")]
struct Cli {
    /// YAML configuration file (falls back to ROUTEIQ_CONFIG).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the predicted department and priority.
    Classify(TicketArgs),
    /// Classify and reconcile against a catalog snapshot.
    Route {
        #[command(flatten)]
        ticket: TicketArgs,
        /// JSON file with `groups` and `priorities` arrays.
        #[arg(long)]
        catalog: PathBuf,
        /// Group name chosen by the requester; wins when it exists.
        #[arg(long)]
        group: Option<String>,
        /// Override the vendor from the config file.
        #[arg(long, value_enum, ignore_case = true)]
        vendor: Option<Vendor>,
    },
    /// Load the model and print its backend and fingerprint.
    Info,
}

#[derive(Debug, Args)]
struct TicketArgs {
    #[arg(long, default_value = "")]
    subject: String,
    /// Ticket body; read from stdin when omitted.
    #[arg(long)]
    description: Option<String>,
}

impl TicketArgs {
    fn into_ticket(self) -> anyhow::Result<TicketText> {
        let description = match self.description {
            Some(d) => d,
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read description from stdin")?;
                buf
            }
        };
        Ok(TicketText::new(self.subject, description))
    }
}

fn init_tracing(config: &RouteIqConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = RouteIqConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Command::Route {
        vendor: Some(vendor),
        ..
    } = &cli.command
    {
        config.routing.vendor = *vendor;
    }
    init_tracing(&config);

    let router = Router::from_config(&config).context("failed to load classifier")?;

    match cli.command {
        Command::Classify(ticket) => {
            let classification = router.classify(&ticket.into_ticket()?)?;
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Command::Route {
            ticket,
            catalog,
            group,
            ..
        } => {
            let raw = fs::read_to_string(&catalog)
                .with_context(|| format!("failed to read catalog {}", catalog.display()))?;
            let snapshot: CatalogSnapshot = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse catalog {}", catalog.display()))?;
            let routed = router.route(&ticket.into_ticket()?, &snapshot, group.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&routed)?);
        }
        Command::Info => {
            let service = router.service();
            let info = serde_json::json!({
                "backend": service.backend(),
                "fingerprint": service.fingerprint(),
                "vendor": config.routing.vendor,
                "normalize_version": service.normalize_config().version,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
