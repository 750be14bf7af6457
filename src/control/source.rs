//! Document fetching with bounded retries.

use std::path::{Path, PathBuf};

use crate::config::ControlConfig;
use crate::model::{read_document, BrokerConfig, DocumentError};
use crate::resilience::RetryPolicy;

#[derive(Debug, Clone)]
pub struct DocumentSource {
    path: PathBuf,
    policy: RetryPolicy,
}

impl DocumentSource {
    pub fn new(path: impl Into<PathBuf>, policy: RetryPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn from_config(config: &ControlConfig) -> Self {
        Self::new(
            config.document_path.clone(),
            RetryPolicy {
                max_attempts: config.fetch_attempts,
                base_delay_ms: config.base_delay_ms,
                max_delay_ms: config.max_delay_ms,
            },
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current model, retrying on failure.
    pub async fn fetch(&self) -> Result<BrokerConfig, DocumentError> {
        let model = self.policy.run(|| read_document(&self.path)).await?;
        tracing::info!(
            path = %self.path.display(),
            accounts = model.accounts.len(),
            port = model.server.port,
            "Configuration document loaded"
        );
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"natsServer": {"port": 4222}}"#).unwrap();

        let model = DocumentSource::new(&path, policy(1)).fetch().await.unwrap();
        assert_eq!(model.server.port, 4222);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_attempts() {
        let dir = tempdir().unwrap();
        let source = DocumentSource::new(dir.path().join("missing.json"), policy(3));
        assert!(matches!(source.fetch().await, Err(DocumentError::Io(_))));
    }

    #[tokio::test]
    async fn test_fetch_recovers_when_document_appears() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let source = DocumentSource::new(
            &path,
            RetryPolicy {
                max_attempts: 10,
                base_delay_ms: 20,
                max_delay_ms: 50,
            },
        );

        let writer = {
            let path = path.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(30)).await;
                fs::write(&path, r#"{"natsServer": {"port": 5222}}"#).unwrap();
            })
        };
        let model = source.fetch().await.unwrap();
        writer.await.unwrap();
        assert_eq!(model.server.port, 5222);
    }
}
