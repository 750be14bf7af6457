//! Configuration synthesis subsystem.
//!
//! # Data Flow
//! ```text
//! BrokerConfig + Layout
//!     → accounts.rs  → Document → accounts.conf
//!     → server.rs    → Document → nats-server.conf (includes accounts.conf)
//!     → document.rs serializes each tree in one deterministic pass
//! ```
//!
//! # Design Decisions
//! - Rendering is a pure function of the model and the layout
//! - Both artifacts are regenerated in full on every update
//! - Values are passed through verbatim; the broker's parser is the validator

pub mod accounts;
pub mod document;
pub mod server;

use std::path::PathBuf;

use thiserror::Error;

pub use accounts::render_accounts;
pub use server::render_server;

use crate::layout::Layout;
use crate::model::BrokerConfig;
use crate::update::writer::{ensure_dir, StagedWrites, PUBLIC_MODE};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create config directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Both text artifacts for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    pub accounts: String,
    pub server: String,
}

/// Renders a model into the accounts and server artifacts.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    layout: Layout,
}

impl Synthesizer {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn render(&self, config: &BrokerConfig) -> RenderedConfig {
        RenderedConfig {
            accounts: render_accounts(config),
            server: render_server(config, &self.layout),
        }
    }

    /// Stage both artifacts into `batch`, accounts first.
    pub fn stage(
        &self,
        rendered: &RenderedConfig,
        batch: &mut StagedWrites,
    ) -> Result<(), RenderError> {
        let root = self.layout.root();
        ensure_dir(root).map_err(|source| RenderError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;

        for (path, contents) in [
            (self.layout.accounts_conf(), &rendered.accounts),
            (self.layout.server_conf(), &rendered.server),
        ] {
            tracing::info!(path = %path.display(), "Staging broker configuration");
            batch
                .stage(&path, contents.as_bytes(), PUBLIC_MODE)
                .map_err(|source| RenderError::Write { path, source })?;
        }
        Ok(())
    }
}
