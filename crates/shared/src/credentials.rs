//! Portal credentials loaded from a local JSON or YAML file

use crate::error::{PortalNotFoundError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// API token for one portal
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalCredentials {
    /// Access id (public half of the token)
    pub access_id: String,

    /// Access key (shared secret used to sign requests)
    pub access_key: String,

    /// Company name, i.e. the portal's subdomain
    #[serde(alias = "company")]
    pub company_name: String,
}

impl fmt::Debug for PortalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalCredentials")
            .field("access_id", &self.access_id)
            .field("access_key", &"<redacted>")
            .field("company_name", &self.company_name)
            .finish()
    }
}

/// All credential entries of a credentials file, keyed by label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialStore {
    portals: BTreeMap<String, PortalCredentials>,
}

impl CredentialStore {
    /// Load the store from a file; `.yaml`/`.yml` are parsed as YAML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let store = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(store)
    }

    pub fn insert(&mut self, label: impl Into<String>, credentials: PortalCredentials) {
        self.portals.insert(label.into(), credentials);
    }

    /// Look up a portal by label
    pub fn get(&self, label: &str) -> Result<&PortalCredentials> {
        self.portals.get(label).ok_or_else(|| {
            PortalNotFoundError {
                portal: label.to_string(),
                available_portals: self.portal_names().into_iter().map(String::from).collect(),
            }
            .into()
        })
    }

    /// Portal labels in sorted order
    pub fn portal_names(&self) -> Vec<&str> {
        self.portals.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PortalCredentials)> {
        self.portals.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }
}
