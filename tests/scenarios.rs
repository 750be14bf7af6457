//! End-to-end synthesis scenarios driven by controller documents.

use std::fs;

use nats_edge_agent::model::parse_document;
use nats_edge_agent::{Layout, UpdateCoordinator};
use tempfile::tempdir;

mod common;

#[tokio::test]
async fn test_system_account_scenario() {
    let dir = tempdir().unwrap();
    let layout = Layout::new(dir.path().join("nats-config"));
    let coordinator = UpdateCoordinator::new(layout.clone());

    let model = parse_document(&common::system_account_document(4222)).unwrap();
    coordinator.apply(model).await.unwrap();

    let accounts = fs::read_to_string(layout.accounts_conf()).unwrap();
    assert!(accounts.contains("    sys {\n"));
    assert_eq!(accounts.matches("{user: ").count(), 1);
    assert!(accounts.contains("{user: admin, password: pw1}"));
    assert!(accounts.contains("system_account: sys\n"));
    assert!(!accounts.contains("jetstream"));

    let server = fs::read_to_string(layout.server_conf()).unwrap();
    assert_eq!(server, "port: 4222\ninclude ./accounts.conf\n");
    for role_dir in ["server-cert", "leaf-cert", "mqtt-cert"] {
        assert!(!layout.root().join(role_dir).exists());
    }
}

#[tokio::test]
async fn test_leaf_remote_with_ca_only() {
    let dir = tempdir().unwrap();
    let layout = Layout::new(dir.path());
    let coordinator = UpdateCoordinator::new(layout.clone());

    let ca = b"-----BEGIN CERTIFICATE-----\nparent-ca\n-----END CERTIFICATE-----\n";
    let document = format!(
        r#"{{
            "accounts": [{{"accountName": "A", "users": [], "jetstream": true}}],
            "natsServer": {{
                "port": 4222,
                "leafNodes": {{
                    "remotes": {{
                        "urlProtocol": "nats",
                        "url": "parent.example:7422",
                        "user": "u",
                        "password": "p",
                        "account": "A",
                        "tls": {{"caCert": "{}", "tlsCert": "", "tlsKey": ""}}
                    }}
                }}
            }}
        }}"#,
        common::b64(ca)
    );
    coordinator.apply(parse_document(&document).unwrap()).await.unwrap();

    let leaf_dir = dir.path().join("leaf-cert");
    let names: Vec<_> = fs::read_dir(&leaf_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["ca.crt"]);
    assert_eq!(fs::read(leaf_dir.join("ca.crt")).unwrap(), ca);

    let server = fs::read_to_string(layout.server_conf()).unwrap();
    assert!(server.contains("urls: [\"nats://u:p@parent.example:7422\"]"));
    assert!(server.contains("account: \"A\""));
    for file in ["ca.crt", "tls.crt", "tls.key"] {
        let reference = format!("{}\"", leaf_dir.join(file).display());
        assert!(server.contains(&reference), "missing reference to {file}");
    }
    assert!(!server.contains("server-cert"));
}

#[tokio::test]
async fn test_reapply_is_byte_identical() {
    let dir = tempdir().unwrap();
    let layout = Layout::new(dir.path());
    let coordinator = UpdateCoordinator::new(layout.clone());
    let document = format!(
        r#"{{
            "natsServer": {{
                "port": 4222,
                "serverName": "edge-1",
                "jsDomain": "edge",
                "tls": {{"caCert": "{ca}", "tlsCert": "{cert}", "tlsKey": "{key}"}},
                "mqtt": {{"port": 1883, "tls": {{"tlsCert": "{cert}"}}}},
                "mqttAuthorization": [{{"userName": "m", "password": "mp"}}]
            }}
        }}"#,
        ca = common::b64(b"ca"),
        cert = common::b64(b"cert"),
        key = common::b64(b"key"),
    );

    coordinator.apply(parse_document(&document).unwrap()).await.unwrap();
    let first = (
        fs::read(layout.server_conf()).unwrap(),
        fs::read(layout.accounts_conf()).unwrap(),
    );
    coordinator.apply(parse_document(&document).unwrap()).await.unwrap();
    let second = (
        fs::read(layout.server_conf()).unwrap(),
        fs::read(layout.accounts_conf()).unwrap(),
    );
    assert_eq!(first, second);
    assert_eq!(fs::read(dir.path().join("mqtt-cert/tls.crt")).unwrap(), b"cert");
    assert!(!dir.path().join("mqtt-cert/ca.crt").exists());
}
