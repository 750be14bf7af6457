//! Main server artifact rendering.
//!
//! Blocks are emitted in a fixed order, each only when its input is set:
//! port, server_name, jetstream, leafnodes, tls, mqtt, authorization, and
//! finally the include of the accounts artifact. There is no cross-block
//! validation.

use super::accounts::user_entry;
use super::document::{Block, Document, Entry, Value};
use crate::layout::{Layout, TlsFile, TlsRole, ACCOUNTS_CONF};
use crate::model::schema::present;
use crate::model::{BrokerConfig, LeafNodeSettings, MqttSettings};

/// Connection type the secondary-protocol users are restricted to.
pub const MQTT_CONNECTION_TYPE: &str = "MQTT";

/// Build the server document for `config` under `layout`.
pub fn server_document(config: &BrokerConfig, layout: &Layout) -> Document {
    let server = &config.server;
    let mut body = Block::new().int("port", server.port);

    if let Some(name) = server.server_name() {
        body.push("server_name", Value::bare(name));
    }

    if let Some(domain) = server.jetstream_domain() {
        body.push(
            "jetstream",
            Value::Block(
                Block::new()
                    .quoted("store_dir", layout.store_dir.clone())
                    .quoted("domain", domain),
            ),
        );
    }

    if let Some(leaf) = server.leaf_node() {
        body.push("leafnodes", Value::Block(leaf_block(leaf, layout)));
    }

    if present(&server.tls).is_some() {
        body.push("tls", Value::Block(tls_block(layout, TlsRole::Server)));
    }

    if let Some(mqtt) = server.mqtt() {
        body.push("mqtt", Value::Block(mqtt_block(mqtt, layout)));
    }

    if !server.mqtt_authorization.is_empty() {
        let users = server
            .mqtt_authorization
            .iter()
            .map(|credential| {
                let mut entries = user_entry(credential);
                entries.push(Entry::new(
                    "allowed_connection_types",
                    Value::List(vec![Value::quoted(MQTT_CONNECTION_TYPE)]),
                ));
                Value::Inline(entries)
            })
            .collect();
        body.push("authorization", Value::Block(Block::new().list("users", users)));
    }

    Document::new(body).include(format!("./{}", ACCOUNTS_CONF))
}

pub fn render_server(config: &BrokerConfig, layout: &Layout) -> String {
    server_document(config, layout).render()
}

fn leaf_block(leaf: &LeafNodeSettings, layout: &Layout) -> Block {
    let mut block = Block::new();
    if let Some(port) = leaf.listen_port() {
        block.push("port", Value::Int(port.into()));
    }
    if let Some(remote) = leaf.remote() {
        let mut entry = Block::new()
            .list("urls", vec![Value::quoted(remote.url())])
            .quoted("account", remote.account.clone());
        if present(&remote.tls).is_some() {
            entry.push("tls", Value::Block(tls_block(layout, TlsRole::LeafRemote)));
        }
        block.push("remotes", Value::List(vec![Value::Block(entry)]));
    }
    block
}

fn mqtt_block(mqtt: &MqttSettings, layout: &Layout) -> Block {
    let mut block = Block::new();
    if let Some(port) = mqtt.listen_port() {
        block.push("port", Value::Int(port.into()));
    }
    if let Some(domain) = mqtt.jetstream_domain() {
        block.push("js_domain", Value::quoted(domain));
    }
    if present(&mqtt.tls).is_some() {
        block.push("tls", Value::Block(tls_block(layout, TlsRole::Mqtt)));
    }
    block
}

/// TLS block referencing all three fixed files of `role`, whether or not
/// each was provisioned.
fn tls_block(layout: &Layout, role: TlsRole) -> Block {
    let path = |file| layout.tls_file(role, file).display().to_string();
    Block::new()
        .quoted("ca_file", path(TlsFile::Ca))
        .quoted("cert_file", path(TlsFile::Cert))
        .quoted("key_file", path(TlsFile::Key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Credential, RemoteLeaf, ServerSettings, TlsMaterial};

    fn base() -> BrokerConfig {
        BrokerConfig {
            accounts: Vec::new(),
            server: ServerSettings {
                port: 4222,
                ..Default::default()
            },
        }
    }

    fn ca_only() -> Option<TlsMaterial> {
        Some(TlsMaterial {
            ca_cert: Some("Y2E=".into()),
            ..Default::default()
        })
    }

    #[test]
    fn test_minimal_server() {
        let rendered = render_server(&base(), &Layout::new("/cfg"));
        assert_eq!(rendered, "port: 4222\ninclude ./accounts.conf\n");
    }

    #[test]
    fn test_full_server_block_order() {
        let mut config = base();
        config.server.server_name = Some("edge-1".into());
        config.server.jetstream_domain = Some("edge".into());
        config.server.tls = ca_only();
        config.server.leaf_node = Some(LeafNodeSettings {
            port: Some(7422),
            remote: Some(RemoteLeaf {
                url_scheme: "nats".into(),
                host: "parent.example:7422".into(),
                user: "u".into(),
                password: "p".into(),
                account: "A".into(),
                tls: ca_only(),
            }),
        });
        config.server.mqtt = Some(MqttSettings {
            port: Some(1883),
            jetstream_domain: Some("edge".into()),
            tls: ca_only(),
        });
        config.server.mqtt_authorization = vec![Credential::new("m", "mp")];

        let rendered = render_server(&config, &Layout::new("/cfg"));
        let expected = r#"port: 4222
server_name: edge-1
jetstream {
    store_dir: "./store_leaf"
    domain: "edge"
}
leafnodes {
    port: 7422
    remotes: [
        {
            urls: ["nats://u:p@parent.example:7422"]
            account: "A"
            tls {
                ca_file: "/cfg/leaf-cert/ca.crt"
                cert_file: "/cfg/leaf-cert/tls.crt"
                key_file: "/cfg/leaf-cert/tls.key"
            }
        }
    ]
}
tls {
    ca_file: "/cfg/server-cert/ca.crt"
    cert_file: "/cfg/server-cert/tls.crt"
    key_file: "/cfg/server-cert/tls.key"
}
mqtt {
    port: 1883
    js_domain: "edge"
    tls {
        ca_file: "/cfg/mqtt-cert/ca.crt"
        cert_file: "/cfg/mqtt-cert/tls.crt"
        key_file: "/cfg/mqtt-cert/tls.key"
    }
}
authorization {
    users: [
        {user: m, password: mp, allowed_connection_types: ["MQTT"]}
    ]
}
include ./accounts.conf
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_leaf_listen_only() {
        let mut config = base();
        config.server.leaf_node = Some(LeafNodeSettings {
            port: Some(7422),
            remote: None,
        });
        let rendered = render_server(&config, &Layout::new("/cfg"));
        assert!(rendered.contains("leafnodes {\n    port: 7422\n}\n"));
        assert!(!rendered.contains("remotes"));
    }

    #[test]
    fn test_remote_without_tls_has_no_tls_block() {
        let mut config = base();
        config.server.leaf_node = Some(LeafNodeSettings {
            port: None,
            remote: Some(RemoteLeaf {
                url_scheme: "tls".into(),
                host: "hub:7422".into(),
                user: "u".into(),
                password: "p".into(),
                account: "A".into(),
                tls: Some(TlsMaterial::default()),
            }),
        });
        let rendered = render_server(&config, &Layout::new("/cfg"));
        assert!(rendered.contains("urls: [\"tls://u:p@hub:7422\"]"));
        assert!(!rendered.contains("tls {"));
        assert!(!rendered.contains("    port:"));
    }

    #[test]
    fn test_mqtt_without_port_is_skipped() {
        let mut config = base();
        config.server.mqtt = Some(MqttSettings {
            port: None,
            jetstream_domain: Some("edge".into()),
            tls: ca_only(),
        });
        let rendered = render_server(&config, &Layout::new("/cfg"));
        assert!(!rendered.contains("mqtt"));
    }

    #[test]
    fn test_empty_server_name_is_skipped() {
        let mut config = base();
        config.server.server_name = Some(String::new());
        config.server.jetstream_domain = Some(String::new());
        let rendered = render_server(&config, &Layout::new("/cfg"));
        assert_eq!(rendered, "port: 4222\ninclude ./accounts.conf\n");
    }
}
