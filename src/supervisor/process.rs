//! Broker subprocess launch and exit reporting.

use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::sync::oneshot;

use crate::model::BrokerConfig;
use crate::observability::metrics;
use crate::update::{UpdateCoordinator, UpdateError};

/// Why the broker stopped, when it did not stop cleanly.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("broker exited with {0}")]
    Exited(ExitStatus),

    #[error("failed to wait for broker: {0}")]
    Wait(#[source] std::io::Error),

    #[error("broker monitor stopped without reporting")]
    MonitorLost,
}

/// Terminal event of a broker process: `Ok` on a zero exit status.
pub type ExitReport = Result<(), ProcessError>;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("failed to start broker '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
}

/// How the broker executable is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerCommand {
    pub binary: String,
    /// Passed as `--name` when the model runs in a leaf role.
    pub instance_name: Option<String>,
}

impl BrokerCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            instance_name: None,
        }
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    /// Argument list for `config`, pointing at `server_conf`.
    pub fn args(&self, config: &BrokerConfig, server_conf: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(4);
        let leaf_role = config.server.leaf_node().is_some();
        if let Some(name) = self.instance_name.as_deref().filter(|n| !n.is_empty()) {
            if leaf_role {
                args.push(OsString::from("--name"));
                args.push(OsString::from(name));
            }
        }
        args.push(OsString::from("-c"));
        args.push(server_conf.as_os_str().to_os_string());
        args
    }
}

/// Handle to a running broker.
#[derive(Debug)]
pub struct BrokerProcess {
    pid: Option<u32>,
    stop: Option<oneshot::Sender<()>>,
    exit: Option<oneshot::Receiver<ExitReport>>,
}

impl BrokerProcess {
    /// OS process id, if the child was still alive when spawned.
    pub fn id(&self) -> Option<u32> {
        self.pid
    }

    /// Ask the monitor to kill the broker. The exit report still arrives
    /// through [`BrokerProcess::exited`].
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            tracing::info!(pid = ?self.pid, "Stopping broker");
            let _ = stop.send(());
        }
    }

    /// Wait for the broker to terminate.
    ///
    /// Resolves once with the exit report; later calls never resolve.
    /// Cancel safe.
    pub async fn exited(&mut self) -> ExitReport {
        let Some(exit) = self.exit.as_mut() else {
            return std::future::pending().await;
        };
        let report = exit.await.unwrap_or(Err(ProcessError::MonitorLost));
        self.exit = None;
        report
    }
}

/// Starts brokers against synthesized configuration.
#[derive(Debug, Clone)]
pub struct Supervisor {
    coordinator: UpdateCoordinator,
    command: BrokerCommand,
}

impl Supervisor {
    pub fn new(coordinator: UpdateCoordinator, command: BrokerCommand) -> Self {
        Self {
            coordinator,
            command,
        }
    }

    pub fn coordinator(&self) -> &UpdateCoordinator {
        &self.coordinator
    }

    /// Apply `config`, then start the broker against it.
    pub async fn launch(&self, config: BrokerConfig) -> Result<BrokerProcess, SupervisorError> {
        let args = self.args(&config);
        self.coordinator.apply(config).await?;
        self.start(args)
    }

    /// Start the broker against configuration that is already on disk.
    ///
    /// `config` only shapes the argument list; nothing is provisioned or
    /// rendered.
    pub fn spawn(&self, config: &BrokerConfig) -> Result<BrokerProcess, SupervisorError> {
        self.start(self.args(config))
    }

    fn args(&self, config: &BrokerConfig) -> Vec<OsString> {
        self.command.args(config, &self.coordinator.layout().server_conf())
    }

    fn start(&self, args: Vec<OsString>) -> Result<BrokerProcess, SupervisorError> {
        let child = Command::new(&self.command.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                tracing::error!(binary = %self.command.binary, error = %source, "Failed to start broker");
                SupervisorError::Spawn {
                    binary: self.command.binary.clone(),
                    source,
                }
            })?;

        let pid = child.id();
        tracing::info!(binary = %self.command.binary, pid = ?pid, ?args, "Broker started");
        metrics::record_broker_launch();

        let (stop_tx, stop_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = oneshot::channel();
        tokio::spawn(monitor(child, stop_rx, exit_tx));

        Ok(BrokerProcess {
            pid,
            stop: Some(stop_tx),
            exit: Some(exit_rx),
        })
    }
}

async fn monitor(
    mut child: Child,
    stop: oneshot::Receiver<()>,
    exit: oneshot::Sender<ExitReport>,
) {
    let pid = child.id();
    let waited = tokio::select! {
        status = child.wait() => Some(status),
        _ = stop => None,
    };
    let status = match waited {
        Some(status) => status,
        None => {
            if let Err(e) = child.start_kill() {
                tracing::warn!(pid = ?pid, error = %e, "Failed to signal broker");
            }
            child.wait().await
        }
    };

    let report = match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(ProcessError::Exited(status)),
        Err(e) => Err(ProcessError::Wait(e)),
    };
    match &report {
        Ok(()) => tracing::info!(pid = ?pid, "Broker exited"),
        Err(e) => tracing::warn!(pid = ?pid, error = %e, "Broker exited with error"),
    }
    metrics::record_broker_exit(report.is_ok());

    let _ = exit.send(report);
}
