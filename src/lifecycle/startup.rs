//! Startup orchestration and the owning control loop.
//!
//! # Responsibilities
//! - Launch the broker against the initial model
//! - Apply every subsequent model delivered by the document source
//! - Decide what a broker exit or a failed update means for the host
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Recoverable update failures leave the broker on its last good configuration
//! - With `restart_on_update`, the broker is only stopped after the new
//!   configuration has been written successfully

use thiserror::Error;
use tokio::sync::mpsc;

use super::shutdown::ShutdownSignal;
use crate::control::DocumentSource;
use crate::model::BrokerConfig;
use crate::supervisor::{BrokerProcess, ExitReport, Supervisor, SupervisorError};
use crate::update::UpdateError;

/// Why the control loop returned.
#[derive(Debug)]
pub enum AgentExit {
    /// Shutdown was requested; the broker has been stopped.
    Shutdown,
    /// The broker terminated on its own.
    BrokerExited(ExitReport),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("broker launch failed: {0}")]
    Launch(#[from] SupervisorError),

    #[error("fatal configuration update error: {0}")]
    Update(#[from] UpdateError),
}

enum Event {
    Exited(ExitReport),
    Update(BrokerConfig),
    Reload,
    Shutdown,
}

/// The owning control loop around the supervisor.
pub struct Agent {
    supervisor: Supervisor,
    restart_on_update: bool,
    source: Option<DocumentSource>,
}

impl Agent {
    pub fn new(supervisor: Supervisor) -> Self {
        Self {
            supervisor,
            restart_on_update: false,
            source: None,
        }
    }

    /// Restart the broker after each successful update.
    pub fn restart_on_update(mut self, enabled: bool) -> Self {
        self.restart_on_update = enabled;
        self
    }

    /// Source re-read on reload requests.
    pub fn with_source(mut self, source: DocumentSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Launch the broker with `initial` and run until it exits or shutdown
    /// is requested.
    pub async fn run(
        self,
        initial: BrokerConfig,
        mut updates: mpsc::UnboundedReceiver<BrokerConfig>,
        mut reloads: mpsc::UnboundedReceiver<()>,
        mut shutdown: ShutdownSignal,
    ) -> Result<AgentExit, AgentError> {
        let mut broker = self.supervisor.launch(initial).await?;
        tracing::info!(pid = ?broker.id(), restart_on_update = self.restart_on_update, "Agent running");

        loop {
            let event = tokio::select! {
                report = broker.exited() => Event::Exited(report),
                Some(model) = updates.recv() => Event::Update(model),
                Some(()) = reloads.recv() => Event::Reload,
                _ = shutdown.recv() => Event::Shutdown,
            };

            match event {
                Event::Exited(report) => {
                    match &report {
                        Ok(()) => tracing::info!("Broker exited, agent stopping"),
                        Err(e) => tracing::error!(error = %e, "Broker failed, agent stopping"),
                    }
                    return Ok(AgentExit::BrokerExited(report));
                }
                Event::Update(model) => {
                    broker = self.handle_update(broker, model).await?;
                }
                Event::Reload => match &self.source {
                    Some(source) => match source.fetch().await {
                        Ok(model) => broker = self.handle_update(broker, model).await?,
                        Err(e) => {
                            tracing::error!(error = %e, "Reload failed. Keeping current configuration.")
                        }
                    },
                    None => tracing::warn!("Reload requested but no document source configured"),
                },
                Event::Shutdown => {
                    broker.stop();
                    let report = broker.exited().await;
                    tracing::info!(clean = report.is_ok(), "Broker stopped for shutdown");
                    return Ok(AgentExit::Shutdown);
                }
            }
        }
    }

    async fn handle_update(
        &self,
        mut broker: BrokerProcess,
        model: BrokerConfig,
    ) -> Result<BrokerProcess, AgentError> {
        let relaunch = self.restart_on_update.then(|| model.clone());

        match self.supervisor.coordinator().apply(model).await {
            Ok(_) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "Update rejected. Broker keeps its last good configuration.");
                return Ok(broker);
            }
        }

        let Some(model) = relaunch else {
            return Ok(broker);
        };

        broker.stop();
        let report = broker.exited().await;
        tracing::info!(clean = report.is_ok(), "Broker stopped for restart");
        Ok(self.supervisor.spawn(&model)?)
    }
}
