//! Read-only secret store backed by a TOML document
//!
//! The store holds named sections (`box_oauth`, `box_jwt`, `box_dev`) from a
//! secrets file. Lookups walk dotted key paths level by level and return
//! `None` on any failed step — a malformed nested shape is never an error,
//! it just fails to resolve. Validation of which paths are required lives
//! with the strategy layer, not here.

use std::path::Path;

use serde::de::DeserializeOwned;
use toml::Value;

use crate::error::{Error, Result};

/// Named secret sections, read-only once loaded.
pub struct SecretStore {
    root: toml::Table,
}

impl SecretStore {
    /// Load the store from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read secrets file {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }

    /// Parse the store from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let root: toml::Table = toml::from_str(contents)?;
        Ok(Self { root })
    }

    /// Whole named section, if present.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    /// Resolve a dotted key path inside a section.
    ///
    /// Each path component must step through a table; anything else
    /// (missing key, scalar mid-path, absent section) resolves to `None`.
    pub fn resolve(&self, section: &str, path: &str) -> Option<&Value> {
        let mut current = self.root.get(section)?;
        for part in path.split('.') {
            current = current.as_table()?.get(part)?;
        }
        Some(current)
    }

    /// Resolve a dotted key path to a string value.
    pub fn resolve_str(&self, section: &str, path: &str) -> Option<&str> {
        self.resolve(section, path).and_then(Value::as_str)
    }

    /// Deserialize a whole section into a typed config.
    ///
    /// Returns `Config` if the section is absent; shape mismatches surface
    /// the underlying TOML error.
    pub fn parse_section<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .root
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Config(format!("missing secrets section [{name}]")))?;
        value
            .try_into()
            .map_err(|e| Error::Config(format!("invalid [{name}] section: {e}")))
    }
}
