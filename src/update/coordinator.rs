//! Serialized provisioning and synthesis.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::layout::Layout;
use crate::model::BrokerConfig;
use crate::observability::metrics;
use crate::render::{RenderError, RenderedConfig, Synthesizer};
use crate::tls::{TlsError, TlsProvisioner};
use crate::update::writer::{CommitError, StagedWrites};

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("TLS provisioning failed: {0}")]
    Tls(#[from] TlsError),

    #[error("configuration synthesis failed: {0}")]
    Render(#[from] RenderError),

    #[error("update not committed: {0}")]
    Commit(#[from] CommitError),

    #[error("update task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl UpdateError {
    /// Fatal errors must stop startup or the host process.
    pub fn is_fatal(&self) -> bool {
        match self {
            UpdateError::Tls(e) => e.is_fatal(),
            UpdateError::Render(_) | UpdateError::Commit(_) => false,
            UpdateError::Task(_) => true,
        }
    }
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct AppliedUpdate {
    pub tls_files: Vec<PathBuf>,
    pub rendered: RenderedConfig,
}

struct Pipeline {
    provisioner: TlsProvisioner,
    synthesizer: Synthesizer,
}

impl Pipeline {
    fn run(&self, config: &BrokerConfig) -> Result<AppliedUpdate, UpdateError> {
        let mut batch = StagedWrites::new();
        let tls_files = self.provisioner.stage(config, &mut batch)?;
        let rendered = self.synthesizer.render(config);
        self.synthesizer.stage(&rendered, &mut batch)?;
        tracing::debug!(files = batch.len(), "Committing staged files");
        batch.commit()?;
        Ok(AppliedUpdate {
            tls_files,
            rendered,
        })
    }
}

/// Exclusive-access coordinator over the configuration directory.
///
/// Cheap to clone; clones share the same lock.
#[derive(Clone)]
pub struct UpdateCoordinator {
    layout: Layout,
    pipeline: Arc<Pipeline>,
    lock: Arc<Mutex<()>>,
}

impl UpdateCoordinator {
    pub fn new(layout: Layout) -> Self {
        let pipeline = Pipeline {
            provisioner: TlsProvisioner::new(layout.clone()),
            synthesizer: Synthesizer::new(layout.clone()),
        };
        Self {
            layout,
            pipeline: Arc::new(pipeline),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Provision TLS material and write both artifacts for `config`.
    ///
    /// Concurrent callers wait their turn in call order. Once started, the
    /// update runs to completion even if the returned future is dropped.
    pub async fn apply(&self, config: BrokerConfig) -> Result<AppliedUpdate, UpdateError> {
        let guard = self.lock.clone().lock_owned().await;
        let pipeline = self.pipeline.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            pipeline.run(&config)
        })
        .await
        .map_err(UpdateError::from)
        .and_then(|result| result);

        match &outcome {
            Ok(applied) => {
                tracing::info!(
                    root = %self.layout.root().display(),
                    tls_files = applied.tls_files.len(),
                    "Broker configuration updated"
                );
                metrics::record_update("success");
            }
            Err(e) => {
                tracing::error!(error = %e, fatal = e.is_fatal(), "Broker configuration update failed");
                metrics::record_update(if e.is_fatal() { "fatal" } else { "failed" });
            }
        }
        outcome
    }
}

impl std::fmt::Debug for UpdateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator")
            .field("layout", &self.layout)
            .finish()
    }
}
