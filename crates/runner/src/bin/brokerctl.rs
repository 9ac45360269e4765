use anyhow::Context;
use broker_core::{Operation, Quantity, TransactionRequest};
use broker_registry::BrokerRegistry;
use broker_runner::{BrokerService, FileSource, StaticSource, commands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// Inspect and drive the broker registry
#[derive(Parser, Debug)]
#[command(name = "brokerctl", version, about)]
struct Cli {
    /// Broker configuration file (defaults to the embedded configuration)
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered providers and their brokers
    List,
    /// Re-read configuration and re-register the defaults
    Reload,
    /// Price a transaction without committing it
    Quote {
        subject_type: String,
        subject: String,
        operation: Operation,
        quantity: Quantity,
    },
    /// Registry metrics as JSON
    Metrics,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let registry = Arc::new(BrokerRegistry::new());
    let service = match &cli.config {
        Some(path) => BrokerService::new(registry, FileSource::new(path)),
        None => BrokerService::new(registry, StaticSource::embedded()?),
    };
    service
        .start()
        .context("failed to register the configured brokers")?;

    let output = match cli.command {
        Command::List => commands::list(&service),
        Command::Reload => commands::reload(&service)?,
        Command::Quote {
            subject_type,
            subject,
            operation,
            quantity,
        } => {
            let request = TransactionRequest::new(operation, subject_type, subject, quantity)?;
            commands::quote(&service, &request)
        }
        Command::Metrics => commands::metrics(&service)?,
    };
    println!("{}", output);

    service.stop();
    Ok(())
}
