//! Configuration model definitions.
//!
//! This module defines the desired broker state delivered by the controller.
//! All types derive Serde traits for deserialization from the JSON document.

use serde::{Deserialize, Serialize};

use super::de::lenient;
use crate::layout::TlsFile;

/// Root of the configuration model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BrokerConfig {
    /// Accounts in document order.
    #[serde(default, deserialize_with = "lenient")]
    pub accounts: Vec<Account>,

    /// Server network settings.
    #[serde(rename = "natsServer")]
    pub server: ServerSettings,
}

impl BrokerConfig {
    /// The account marked as system account, if exactly one is marked.
    pub fn system_account(&self) -> Option<&Account> {
        let mut marked = self.accounts.iter().filter(|a| a.is_system_account);
        match (marked.next(), marked.next()) {
            (Some(account), None) => Some(account),
            _ => None,
        }
    }
}

/// A broker account and its users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    /// Bare identifier, emitted unquoted.
    #[serde(rename = "accountName", default, deserialize_with = "lenient")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient")]
    pub users: Vec<Credential>,

    #[serde(rename = "jetstream", default, deserialize_with = "lenient")]
    pub jetstream_enabled: bool,

    #[serde(rename = "isSystem", default, deserialize_with = "lenient")]
    pub is_system_account: bool,
}

/// Username/password pair. Emitted verbatim, without escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credential {
    #[serde(rename = "userName", default, deserialize_with = "lenient")]
    pub username: String,

    #[serde(default, deserialize_with = "lenient")]
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Server network settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(rename = "serverName", default, deserialize_with = "lenient")]
    pub server_name: Option<String>,

    /// Primary client listen port (required).
    pub port: u16,

    /// Enables persistent storage when set.
    #[serde(rename = "jsDomain", default, deserialize_with = "lenient")]
    pub jetstream_domain: Option<String>,

    /// TLS material for the primary listener.
    #[serde(default, deserialize_with = "lenient")]
    pub tls: Option<TlsMaterial>,

    #[serde(rename = "leafNodes", default, deserialize_with = "lenient")]
    pub leaf_node: Option<LeafNodeSettings>,

    /// Secondary protocol listener.
    #[serde(default, deserialize_with = "lenient")]
    pub mqtt: Option<MqttSettings>,

    /// Users scoped to the secondary protocol only.
    #[serde(rename = "mqttAuthorization", default, deserialize_with = "lenient")]
    pub mqtt_authorization: Vec<Credential>,
}

impl ServerSettings {
    pub fn server_name(&self) -> Option<&str> {
        non_empty(&self.server_name)
    }

    pub fn jetstream_domain(&self) -> Option<&str> {
        non_empty(&self.jetstream_domain)
    }

    /// Leaf-node settings, if either side of federation is configured.
    pub fn leaf_node(&self) -> Option<&LeafNodeSettings> {
        self.leaf_node.as_ref().filter(|leaf| leaf.is_enabled())
    }

    /// Secondary protocol settings, if a listen port is configured.
    pub fn mqtt(&self) -> Option<&MqttSettings> {
        self.mqtt.as_ref().filter(|mqtt| mqtt.listen_port().is_some())
    }
}

/// Leaf-node federation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeafNodeSettings {
    /// Accept inbound leaf connections on this port.
    #[serde(default, deserialize_with = "lenient")]
    pub port: Option<u16>,

    /// Federate outward to a parent broker.
    #[serde(rename = "remotes", default, deserialize_with = "lenient")]
    pub remote: Option<RemoteLeaf>,
}

impl LeafNodeSettings {
    pub fn listen_port(&self) -> Option<u16> {
        self.port.filter(|port| *port > 0)
    }

    /// The remote, unless its host is empty.
    pub fn remote(&self) -> Option<&RemoteLeaf> {
        self.remote.as_ref().filter(|remote| !remote.host.is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.listen_port().is_some() || self.remote().is_some()
    }
}

/// Outbound leaf connection to a parent broker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteLeaf {
    #[serde(rename = "urlProtocol", default, deserialize_with = "lenient")]
    pub url_scheme: String,

    /// `host[:port]` of the parent.
    #[serde(rename = "url", default, deserialize_with = "lenient")]
    pub host: String,

    #[serde(default, deserialize_with = "lenient")]
    pub user: String,

    #[serde(default, deserialize_with = "lenient")]
    pub password: String,

    /// Account name on the remote side.
    #[serde(default, deserialize_with = "lenient")]
    pub account: String,

    #[serde(default, deserialize_with = "lenient")]
    pub tls: Option<TlsMaterial>,
}

impl RemoteLeaf {
    /// `{scheme}://{user}:{password}@{host}`, credentials unescaped.
    pub fn url(&self) -> String {
        format!(
            "{}://{}:{}@{}",
            self.url_scheme, self.user, self.password, self.host
        )
    }
}

/// Secondary (MQTT) protocol listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MqttSettings {
    #[serde(default, deserialize_with = "lenient")]
    pub port: Option<u16>,

    #[serde(rename = "jsDomain", default, deserialize_with = "lenient")]
    pub jetstream_domain: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub tls: Option<TlsMaterial>,
}

impl MqttSettings {
    pub fn listen_port(&self) -> Option<u16> {
        self.port.filter(|port| *port > 0)
    }

    pub fn jetstream_domain(&self) -> Option<&str> {
        non_empty(&self.jetstream_domain)
    }
}

/// Base64-encoded certificate material for one role.
///
/// Each field is independently optional. Partial material is provisioned
/// as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsMaterial {
    #[serde(rename = "caCert", default, deserialize_with = "lenient")]
    pub ca_cert: Option<String>,

    #[serde(rename = "tlsCert", default, deserialize_with = "lenient")]
    pub tls_cert: Option<String>,

    #[serde(rename = "tlsKey", default, deserialize_with = "lenient")]
    pub tls_key: Option<String>,
}

impl TlsMaterial {
    /// True when any field is non-empty.
    pub fn is_present(&self) -> bool {
        self.entries().next().is_some()
    }

    /// Non-empty fields paired with the file they are written to.
    pub fn entries(&self) -> impl Iterator<Item = (TlsFile, &str)> {
        [
            (TlsFile::Ca, non_empty(&self.ca_cert)),
            (TlsFile::Cert, non_empty(&self.tls_cert)),
            (TlsFile::Key, non_empty(&self.tls_key)),
        ]
        .into_iter()
        .filter_map(|(file, value)| value.map(|v| (file, v)))
    }
}

/// Material for a role, if any field is present.
pub(crate) fn present(tls: &Option<TlsMaterial>) -> Option<&TlsMaterial> {
    tls.as_ref().filter(|material| material.is_present())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
