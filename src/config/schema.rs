//! Agent settings schema definitions.
//!
//! All types derive Serde traits for deserialization from the settings file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::supervisor::BrokerCommand;

/// Root settings for the agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Broker executable and restart policy.
    pub broker: BrokerSettings,

    /// Where generated configuration lives.
    pub layout: Layout,

    /// Configuration document source.
    pub control: ControlConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Broker executable settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrokerSettings {
    /// Executable name or path.
    pub binary: String,

    /// Instance name passed when running as a leaf node.
    pub instance_name: Option<String>,

    /// Restart the broker after each successful update.
    pub restart_on_update: bool,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            binary: "nats-server".to_string(),
            instance_name: None,
            restart_on_update: false,
        }
    }
}

impl BrokerSettings {
    pub fn command(&self) -> BrokerCommand {
        BrokerCommand {
            binary: self.binary.clone(),
            instance_name: self.instance_name.clone(),
        }
    }
}

/// Configuration document source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// JSON document holding the broker model.
    pub document_path: PathBuf,

    /// Watch the document for changes.
    pub watch: bool,

    /// Watcher poll interval in seconds.
    pub poll_interval_secs: u64,

    /// Attempts when reading the document before giving up.
    pub fetch_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from("./config.json"),
            watch: true,
            poll_interval_secs: 2,
            fetch_attempts: 5,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
