//! On-disk layout of the generated broker configuration.
//!
//! ```text
//! <config_root>/
//!     nats-server.conf      main server artifact
//!     accounts.conf         accounts artifact, included by the main file
//!     server-cert/          primary listener TLS
//!     leaf-cert/            leaf remote TLS
//!     mqtt-cert/            secondary protocol TLS
//!         ca.crt  tls.crt  tls.key
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const SERVER_CONF: &str = "nats-server.conf";
pub const ACCOUNTS_CONF: &str = "accounts.conf";

/// Role a set of TLS material is provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlsRole {
    Server,
    LeafRemote,
    Mqtt,
}

impl TlsRole {
    pub const ALL: [TlsRole; 3] = [TlsRole::Server, TlsRole::LeafRemote, TlsRole::Mqtt];

    pub fn dir_name(self) -> &'static str {
        match self {
            TlsRole::Server => "server-cert",
            TlsRole::LeafRemote => "leaf-cert",
            TlsRole::Mqtt => "mqtt-cert",
        }
    }
}

impl std::fmt::Display for TlsRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One of the three fixed certificate files of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlsFile {
    Ca,
    Cert,
    Key,
}

impl TlsFile {
    pub fn file_name(self) -> &'static str {
        match self {
            TlsFile::Ca => "ca.crt",
            TlsFile::Cert => "tls.crt",
            TlsFile::Key => "tls.key",
        }
    }
}

/// Fixed directory layout the synthesizer and provisioner agree on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Layout {
    /// Root directory holding every generated file.
    pub config_root: PathBuf,

    /// Persistent-storage directory referenced by the jetstream block.
    pub store_dir: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            config_root: PathBuf::from("./nats-config"),
            store_dir: "./store_leaf".to_string(),
        }
    }
}

impl Layout {
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
            ..Default::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.config_root
    }

    pub fn server_conf(&self) -> PathBuf {
        self.config_root.join(SERVER_CONF)
    }

    pub fn accounts_conf(&self) -> PathBuf {
        self.config_root.join(ACCOUNTS_CONF)
    }

    pub fn role_dir(&self, role: TlsRole) -> PathBuf {
        self.config_root.join(role.dir_name())
    }

    pub fn tls_file(&self, role: TlsRole, file: TlsFile) -> PathBuf {
        self.role_dir(role).join(file.file_name())
    }
}
