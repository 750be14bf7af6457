//! Agent settings subsystem.
//!
//! # Data Flow
//! ```text
//! agent settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → split into Layout, BrokerCommand, control and observability settings
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an absent file means a default agent
//! - Validation separates syntactic (serde) from semantic checks
//! - These settings describe the agent itself; the broker model arrives
//!   separately as a JSON document (see `model`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AgentConfig, BrokerSettings, ControlConfig, LogFormat, ObservabilityConfig};
