//! TLS material provisioning subsystem.
//!
//! # Data Flow
//! ```text
//! BrokerConfig
//!     → role_material() picks the material for each role
//!     → provisioner.rs decodes every present field (base64)
//!     → files written under <config_root>/<role-dir>/
//! ```
//!
//! # Design Decisions
//! - All roles are decoded before anything is written
//! - Malformed base64 is fatal; write failures are recoverable
//! - Roles without material touch nothing on disk

pub mod provisioner;

pub use provisioner::{decode_material, TlsError, TlsProvisioner};

use crate::layout::TlsRole;
use crate::model::schema::present;
use crate::model::{BrokerConfig, TlsMaterial};

/// TLS material configured for `role`, if the owning block is rendered and
/// any field is non-empty.
pub fn role_material(config: &BrokerConfig, role: TlsRole) -> Option<&TlsMaterial> {
    let server = &config.server;
    match role {
        TlsRole::Server => present(&server.tls),
        TlsRole::LeafRemote => server
            .leaf_node()
            .and_then(|leaf| leaf.remote())
            .and_then(|remote| present(&remote.tls)),
        TlsRole::Mqtt => server.mqtt().and_then(|mqtt| present(&mqtt.tls)),
    }
}
