//! Inventory entities: collector groups, collectors and devices

use serde::{Deserialize, Serialize};

/// A group of collectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectorGroup {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An agent that runs scripts on the portal's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collector {
    pub id: u64,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub collector_group_id: Option<u64>,
    #[serde(default)]
    pub collector_group_name: Option<String>,
    #[serde(default)]
    pub is_down: bool,
}

impl Collector {
    /// Human readable label, e.g. `#12 web-collector (collector-01)`
    pub fn label(&self) -> String {
        match self.description.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) if desc != self.hostname => {
                format!("#{} {} ({})", self.id, desc, self.hostname)
            }
            _ => format!("#{} {}", self.id, self.hostname),
        }
    }
}

/// A monitored resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub preferred_collector_id: Option<u64>,
}

impl Device {
    pub fn label(&self) -> String {
        match self.display_name.as_deref().filter(|d| !d.is_empty()) {
            Some(display) if display != self.name => {
                format!("#{} {} ({})", self.id, display, self.name)
            }
            _ => format!("#{} {}", self.id, self.name),
        }
    }
}
