//! Configuration document parsing.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::schema::BrokerConfig;
use super::validation::{validate_model, ModelViolation};

/// Errors produced while turning a JSON document into a model.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ModelViolation>),
}

fn join(violations: &[ModelViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate a model from a JSON string.
pub fn parse_document(content: &str) -> Result<BrokerConfig, DocumentError> {
    let config: BrokerConfig = serde_json::from_str(content)?;
    validate_model(&config).map_err(DocumentError::Validation)?;
    Ok(config)
}

/// Read, parse and validate a model from a JSON file.
pub fn read_document(path: &Path) -> Result<BrokerConfig, DocumentError> {
    let content = fs::read_to_string(path)?;
    parse_document(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "accounts": [
            {"accountName": "sys", "users": [{"userName": "admin", "password": "pw1"}],
             "jetstream": false, "isSystem": true},
            {"accountName": "app", "users": [], "jetstream": true, "isSystem": false}
        ],
        "natsServer": {
            "serverName": "edge-1",
            "port": 4222,
            "jsDomain": "edge",
            "leafNodes": {
                "port": 7422,
                "remotes": {"urlProtocol": "nats", "url": "parent.example:7422",
                            "user": "u", "password": "p", "account": "A",
                            "tls": {"caCert": "Y2E="}}
            },
            "tls": {"caCert": "", "tlsCert": "", "tlsKey": ""},
            "mqtt": {"port": 1883, "jsDomain": "edge"},
            "mqttAuthorization": [{"userName": "m", "password": "mp"}]
        }
    }"#;

    #[test]
    fn test_parse_full_document() {
        let config = parse_document(FULL).unwrap();
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.system_account().unwrap().name, "sys");
        assert!(config.accounts[1].jetstream_enabled);

        let server = &config.server;
        assert_eq!(server.port, 4222);
        assert_eq!(server.server_name(), Some("edge-1"));
        assert_eq!(server.jetstream_domain(), Some("edge"));
        assert!(!server.tls.as_ref().unwrap().is_present());

        let leaf = server.leaf_node().unwrap();
        assert_eq!(leaf.listen_port(), Some(7422));
        assert_eq!(leaf.remote().unwrap().url(), "nats://u:p@parent.example:7422");

        assert_eq!(server.mqtt().unwrap().listen_port(), Some(1883));
        assert_eq!(server.mqtt_authorization.len(), 1);
    }

    #[test]
    fn test_missing_optionals_are_absent() {
        let config = parse_document(r#"{"natsServer": {"port": 4222}}"#).unwrap();
        assert!(config.accounts.is_empty());
        assert!(config.server.server_name().is_none());
        assert!(config.server.leaf_node().is_none());
        assert!(config.server.mqtt().is_none());
        assert!(config.server.tls.is_none());
    }

    #[test]
    fn test_malformed_optionals_are_absent() {
        let config = parse_document(
            r#"{"natsServer": {"port": 4222, "serverName": 7, "leafNodes": "nope", "mqtt": {"port": "x"}}}"#,
        )
        .unwrap();
        assert!(config.server.server_name().is_none());
        assert!(config.server.leaf_node().is_none());
        assert!(config.server.mqtt().is_none());
    }

    #[test]
    fn test_missing_port_is_rejected() {
        assert!(matches!(
            parse_document(r#"{"natsServer": {}}"#),
            Err(DocumentError::Parse(_))
        ));
        assert!(matches!(
            parse_document(r#"{"natsServer": {"port": 0}}"#),
            Err(DocumentError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = parse_document(r#"{"natsServer": {"port": 0}}"#).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: client port must be non-zero");
    }
}
