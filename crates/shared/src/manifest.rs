//! Provenance record written next to every pulled module

use crate::module::ModuleKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    pub name: String,
    pub display_name: String,
    pub module_type: String,
    pub source_id: u64,
    /// Portal label the module was pulled from
    pub portal: String,
    /// RFC 3339 pull time
    pub pulled_at: String,
}

impl ModuleManifest {
    /// Build a manifest from a full module definition
    pub fn from_definition(
        kind: ModuleKind,
        source_id: u64,
        definition: &serde_json::Value,
        portal: &str,
    ) -> Self {
        let name = definition["name"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| format!("{}-{}", kind.dir_name(), source_id));
        let display_name = definition["displayName"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(String::from)
            .unwrap_or_else(|| name.clone());

        Self {
            name,
            display_name,
            module_type: kind.type_name().to_string(),
            source_id,
            portal: portal.to_string(),
            pulled_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
