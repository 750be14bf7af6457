//! Accounts artifact rendering.

use super::document::{Block, Document, Entry, Value};
use crate::model::{BrokerConfig, Credential};

/// Build the accounts document.
///
/// One block per account in model order, then `system_account` if exactly
/// one account is marked.
pub fn accounts_document(config: &BrokerConfig) -> Document {
    let mut accounts = Block::new();
    for account in &config.accounts {
        let mut block = Block::new().list("users", users(&account.users));
        if account.jetstream_enabled {
            block.push("jetstream", Value::bare("enabled"));
        }
        accounts.push(account.name.clone(), Value::Block(block));
    }

    let mut body = Block::new().block("accounts", accounts);
    if let Some(system) = config.system_account() {
        body.push("system_account", Value::bare(system.name.clone()));
    }
    Document::new(body)
}

pub fn render_accounts(config: &BrokerConfig) -> String {
    accounts_document(config).render()
}

pub(crate) fn user_entry(credential: &Credential) -> Vec<Entry> {
    vec![
        Entry::new("user", Value::bare(credential.username.clone())),
        Entry::new("password", Value::bare(credential.password.clone())),
    ]
}

fn users(credentials: &[Credential]) -> Vec<Value> {
    credentials
        .iter()
        .map(|c| Value::Inline(user_entry(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Account;

    fn account(name: &str, system: bool, jetstream: bool, users: &[(&str, &str)]) -> Account {
        Account {
            name: name.into(),
            users: users.iter().map(|(u, p)| Credential::new(*u, *p)).collect(),
            jetstream_enabled: jetstream,
            is_system_account: system,
        }
    }

    #[test]
    fn test_system_account_scenario() {
        let config = BrokerConfig {
            accounts: vec![account("sys", true, false, &[("admin", "pw1")])],
            ..Default::default()
        };

        assert_eq!(
            render_accounts(&config),
            "accounts {\n\
             \x20   sys {\n\
             \x20       users: [\n\
             \x20           {user: admin, password: pw1}\n\
             \x20       ]\n\
             \x20   }\n\
             }\n\
             system_account: sys\n"
        );
    }

    #[test]
    fn test_no_system_account_directive_without_marker() {
        let config = BrokerConfig {
            accounts: vec![
                account("app", false, true, &[("a", "b"), ("c", "d")]),
                account("ops", false, false, &[]),
            ],
            ..Default::default()
        };
        let rendered = render_accounts(&config);

        assert!(!rendered.contains("system_account"));
        assert!(rendered.contains("    app {\n"));
        assert!(rendered.contains("        jetstream: enabled\n"));
        assert!(rendered.contains("{user: c, password: d}"));
        assert!(rendered.contains("    ops {\n        users: []\n    }\n"));
        // Model order preserved.
        assert!(rendered.find("app {").unwrap() < rendered.find("ops {").unwrap());
    }

    #[test]
    fn test_exactly_one_system_directive() {
        let config = BrokerConfig {
            accounts: vec![
                account("app", false, false, &[]),
                account("sys", true, false, &[]),
            ],
            ..Default::default()
        };
        let rendered = render_accounts(&config);
        assert_eq!(rendered.matches("system_account").count(), 1);
        assert!(rendered.ends_with("system_account: sys\n"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let config = BrokerConfig {
            accounts: vec![account("sys", true, true, &[("admin", "pw1")])],
            ..Default::default()
        };
        assert_eq!(render_accounts(&config), render_accounts(&config.clone()));
    }
}
