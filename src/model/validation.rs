//! Configuration model validation.
//!
//! # Responsibilities
//! - Enforce the model invariants serde cannot express
//! - At most one system account, unique non-empty account names
//! - A usable client port
//!
//! Values are not checked against the broker grammar. Fragments are passed
//! through verbatim.

use std::collections::HashSet;
use std::fmt;

use super::schema::BrokerConfig;

/// A single semantic problem with a configuration model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelViolation {
    MissingClientPort,
    EmptyAccountName { index: usize },
    DuplicateAccount(String),
    MultipleSystemAccounts(Vec<String>),
}

impl fmt::Display for ModelViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelViolation::MissingClientPort => write!(f, "client port must be non-zero"),
            ModelViolation::EmptyAccountName { index } => {
                write!(f, "account at index {} has an empty name", index)
            }
            ModelViolation::DuplicateAccount(name) => {
                write!(f, "account '{}' is defined more than once", name)
            }
            ModelViolation::MultipleSystemAccounts(names) => {
                write!(f, "multiple system accounts: {}", names.join(", "))
            }
        }
    }
}

/// Validate a model, returning every violation found.
pub fn validate_model(config: &BrokerConfig) -> Result<(), Vec<ModelViolation>> {
    let mut violations = Vec::new();

    if config.server.port == 0 {
        violations.push(ModelViolation::MissingClientPort);
    }

    let mut seen = HashSet::new();
    for (index, account) in config.accounts.iter().enumerate() {
        if account.name.is_empty() {
            violations.push(ModelViolation::EmptyAccountName { index });
        } else if !seen.insert(account.name.as_str()) {
            violations.push(ModelViolation::DuplicateAccount(account.name.clone()));
        }
    }

    let system: Vec<String> = config
        .accounts
        .iter()
        .filter(|a| a.is_system_account)
        .map(|a| a.name.clone())
        .collect();
    if system.len() > 1 {
        violations.push(ModelViolation::MultipleSystemAccounts(system));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
