//! NATS edge agent.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────────┐
//!                     │                      EDGE AGENT                          │
//!                     │                                                          │
//!   config.json       │  ┌─────────┐    ┌─────────────┐    ┌──────────────────┐  │
//!   ──────────────────┼─▶│ control │───▶│    model    │───▶│      update      │  │
//!   (controller)      │  │ watcher │    │ parse+check │    │   coordinator    │  │
//!                     │  └─────────┘    └─────────────┘    └───┬──────────┬───┘  │
//!                     │                                        │          │      │
//!                     │                                        ▼          ▼      │
//!                     │                                  ┌─────────┐ ┌────────┐  │
//!                     │                                  │   tls   │ │ render │  │
//!                     │                                  └────┬────┘ └───┬────┘  │
//!                     │                                       ▼          ▼       │
//!                     │                                  nats-config/ (on disk)  │
//!                     │                                              │           │
//!                     │  ┌───────────┐    ┌────────────┐             │           │
//!                     │  │ lifecycle │───▶│ supervisor │── spawn ────┼──────────┼──▶ nats-server -c
//!                     │  │   agent   │◀───│  monitor   │◀── exit ────┘           │
//!                     │  └───────────┘    └────────────┘                         │
//!                     └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use nats_edge_agent::config::{load_config, validation::validate_config, AgentConfig, ConfigError};
use nats_edge_agent::control::{DocumentSource, DocumentWatcher};
use nats_edge_agent::lifecycle::{spawn_signal_handler, Agent, AgentExit, Shutdown};
use nats_edge_agent::observability::{logging, metrics};
use nats_edge_agent::{Supervisor, UpdateCoordinator};

#[derive(Parser)]
#[command(name = "nats-edge-agent")]
#[command(about = "Synthesizes NATS configuration and supervises the broker", long_about = None)]
struct Cli {
    /// Agent settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration document (JSON), overriding the settings file.
    #[arg(short, long)]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Commands {
    /// Launch the broker and apply configuration changes (default)
    #[default]
    Run,
    /// Provision TLS material and write configuration once, then exit
    Render,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };
    if let Some(document) = cli.document {
        config.control.document_path = document;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level, config.observability.log_format)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_root = %config.layout.config_root.display(),
        document = %config.control.document_path.display(),
        broker = %config.broker.binary,
        "nats-edge-agent starting"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let coordinator = UpdateCoordinator::new(config.layout.clone());
    let source = DocumentSource::from_config(&config.control);
    let initial = source.fetch().await?;

    match cli.command.unwrap_or_default() {
        Commands::Render => {
            let applied = coordinator.apply(initial).await?;
            tracing::info!(tls_files = applied.tls_files.len(), "Configuration rendered");
            Ok(())
        }
        Commands::Run => run(config, coordinator, source, initial).await,
    }
}

async fn run(
    config: AgentConfig,
    coordinator: UpdateCoordinator,
    source: DocumentSource,
    initial: nats_edge_agent::BrokerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Shutdown::new();
    let reloads = spawn_signal_handler(shutdown.clone())?;

    let (_watcher, updates) = if config.control.watch {
        let (watcher, updates) = DocumentWatcher::new(
            source.path(),
            Duration::from_secs(config.control.poll_interval_secs),
        );
        (Some(watcher.run()?), updates)
    } else {
        let (_tx, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let supervisor = Supervisor::new(coordinator, config.broker.command());
    let agent = Agent::new(supervisor)
        .restart_on_update(config.broker.restart_on_update)
        .with_source(source);

    match agent.run(initial, updates, reloads, shutdown.subscribe()).await? {
        AgentExit::Shutdown => {
            tracing::info!("Shutdown complete");
            Ok(())
        }
        AgentExit::BrokerExited(Ok(())) => Ok(()),
        AgentExit::BrokerExited(Err(e)) => Err(e.into()),
    }
}
