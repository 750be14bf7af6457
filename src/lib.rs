//! NATS edge agent library.
//!
//! Synthesizes broker configuration from a controller-supplied model,
//! provisions the TLS material it references, and supervises the broker
//! process that reads it.

pub mod config;
pub mod control;
pub mod layout;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod render;
pub mod resilience;
pub mod supervisor;
pub mod tls;
pub mod update;

pub use layout::Layout;
pub use lifecycle::{Agent, AgentExit, Shutdown};
pub use model::BrokerConfig;
pub use supervisor::{BrokerCommand, Supervisor};
pub use update::UpdateCoordinator;
