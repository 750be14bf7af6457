//! Configuration model subsystem.
//!
//! # Data Flow
//! ```text
//! JSON document (controller schema, camelCase)
//!     → loader.rs (lenient deserialize)
//!     → validation.rs (semantic checks)
//!     → BrokerConfig (owned, never mutated after synthesis)
//!     → handed by value to the update coordinator
//! ```
//!
//! # Design Decisions
//! - Only `natsServer.port` is required; everything else defaults to absent
//! - Fields with the wrong JSON type are treated as absent, not errors
//! - Empty strings and zero ports are equivalent to absent

mod de;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse_document, read_document, DocumentError};
pub use schema::{
    Account, BrokerConfig, Credential, LeafNodeSettings, MqttSettings, RemoteLeaf,
    ServerSettings, TlsMaterial,
};
