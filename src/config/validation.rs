//! Agent settings validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted

use std::fmt;
use std::net::SocketAddr;

use super::schema::AgentConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.broker.binary.trim().is_empty() {
        errors.push(ValidationError::new("broker.binary", "must not be empty"));
    }
    if config.layout.config_root.as_os_str().is_empty() {
        errors.push(ValidationError::new("layout.config_root", "must not be empty"));
    }
    if config.layout.store_dir.is_empty() {
        errors.push(ValidationError::new("layout.store_dir", "must not be empty"));
    }

    let control = &config.control;
    if control.document_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("control.document_path", "must not be empty"));
    }
    if control.fetch_attempts == 0 {
        errors.push(ValidationError::new("control.fetch_attempts", "must be at least 1"));
    }
    if control.watch && control.poll_interval_secs == 0 {
        errors.push(ValidationError::new("control.poll_interval_secs", "must be positive"));
    }
    if control.base_delay_ms > control.max_delay_ms {
        errors.push(ValidationError::new(
            "control.base_delay_ms",
            format!("exceeds max_delay_ms ({})", control.max_delay_ms),
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&AgentConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = AgentConfig::default();
        config.broker.binary = " ".into();
        config.control.fetch_attempts = 0;
        config.control.base_delay_ms = 10_000;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "broker.binary",
                "control.fetch_attempts",
                "control.base_delay_ms",
                "observability.metrics_address"
            ]
        );
        assert_eq!(errors[1].to_string(), "control.fetch_attempts: must be at least 1");
    }
}
