//! Session context: the user's current selection, passed explicitly to operations

use crate::credentials::{CredentialStore, PortalCredentials};
use crate::error::{ClientError, Result};
use crate::inventory::{Collector, Device};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A selected entity, remembered by id with the label shown at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub id: u64,
    pub label: String,
}

/// Collector/device pair a script is executed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionTarget {
    pub collector_id: u64,
    pub device_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(default)]
    pub portal: Option<String>,
    #[serde(default)]
    pub collector: Option<Selection>,
    #[serde(default)]
    pub device: Option<Selection>,
    #[serde(default)]
    pub verbose: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted session; a missing file yields an empty session
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    // ========== Selection ==========

    pub fn set_credentials_file(&mut self, path: PathBuf) {
        self.credentials_file = Some(path);
    }

    /// Switch portal; collector and device belong to the old portal and are cleared
    pub fn select_portal(&mut self, portal: impl Into<String>) {
        let portal = portal.into();
        if self.portal.as_deref() != Some(portal.as_str()) {
            self.collector = None;
            self.device = None;
        }
        self.portal = Some(portal);
    }

    /// Switch collector; the device is cleared unless it is still the same collector
    pub fn select_collector(&mut self, collector: &Collector) {
        if self.collector.as_ref().map(|c| c.id) != Some(collector.id) {
            self.device = None;
        }
        self.collector = Some(Selection {
            id: collector.id,
            label: collector.label(),
        });
    }

    pub fn select_device(&mut self, device: &Device) {
        self.device = Some(Selection {
            id: device.id,
            label: device.label(),
        });
    }

    // ========== Preconditions ==========

    pub fn require_credentials_file(&self) -> Result<&Path> {
        self.credentials_file
            .as_deref()
            .ok_or(ClientError::NoCredentialsFile)
    }

    pub fn require_portal(&self) -> Result<&str> {
        self.portal.as_deref().ok_or(ClientError::NoActivePortal)
    }

    pub fn require_collector(&self) -> Result<&Selection> {
        self.collector.as_ref().ok_or(ClientError::NoActiveCollector)
    }

    /// Collector/device pair for script execution
    pub fn require_target(&self) -> Result<ExecutionTarget> {
        let collector = self.require_collector()?;
        let device = self.device.as_ref().ok_or(ClientError::NoActiveDevice)?;
        Ok(ExecutionTarget {
            collector_id: collector.id,
            device_id: device.id,
        })
    }

    /// Read the credentials file (fresh on every call) and resolve the active portal
    pub fn active_credentials(&self) -> Result<(String, PortalCredentials)> {
        let path = self.require_credentials_file()?;
        let portal = self.require_portal()?;
        let store = CredentialStore::from_file(path)?;
        let credentials = store.get(portal)?.clone();
        Ok((portal.to_string(), credentials))
    }
}
