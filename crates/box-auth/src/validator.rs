//! Credential validation gate
//!
//! Checks that the secret store carries every key a strategy needs before
//! the strategy runs. Fails closed: an absent section, an unresolvable
//! dotted path, or a present-but-empty string all count as missing. The
//! gate is a pure read — it must run (and pass) before any network call.

use common::SecretStore;
use toml::Value;

use crate::error::{AuthError, Result};
use crate::strategy::StrategyKind;

/// Required secret keys for one strategy: a section name plus the dotted
/// paths that must resolve inside it.
pub struct Requirement {
    pub section: &'static str,
    pub paths: &'static [&'static str],
}

/// The keys each strategy needs before it can execute.
pub fn requirements(kind: StrategyKind) -> Requirement {
    match kind {
        StrategyKind::DelegatedCode => Requirement {
            section: "box_oauth",
            paths: &["client_id", "client_secret"],
        },
        StrategyKind::SignedAssertion => Requirement {
            section: "box_jwt",
            paths: &[
                "boxAppSettings.clientID",
                "boxAppSettings.clientSecret",
                "boxAppSettings.appAuth.publicKeyID",
                "boxAppSettings.appAuth.privateKey",
                "boxAppSettings.appAuth.passphrase",
                "enterpriseID",
            ],
        },
        StrategyKind::StaticToken => Requirement {
            section: "box_dev",
            paths: &["client_id", "client_secret", "developer_token"],
        },
    }
}

/// Unresolved identifiers for a strategy, in `section.path` form.
///
/// A wholly absent section reports just the section name; otherwise each
/// path that fails to resolve (or resolves to an empty string) is listed.
pub fn missing_paths(kind: StrategyKind, store: &SecretStore) -> Vec<String> {
    let req = requirements(kind);

    if store.section(req.section).is_none() {
        return vec![req.section.to_string()];
    }

    req.paths
        .iter()
        .filter(|path| !resolves(store, req.section, path))
        .map(|path| format!("{}.{path}", req.section))
        .collect()
}

/// Gate check: `Ok(())` iff every required path resolves.
pub fn validate(kind: StrategyKind, store: &SecretStore) -> Result<()> {
    let missing = missing_paths(kind, store);
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!(strategy = kind.label(), missing = ?missing, "credential validation failed");
        Err(AuthError::ConfigurationIncomplete(missing))
    }
}

fn resolves(store: &SecretStore, section: &str, path: &str) -> bool {
    match store.resolve(section, path) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
        None => false,
    }
}
