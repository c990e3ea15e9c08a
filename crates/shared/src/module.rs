//! Module catalog types
//!
//! Every module kind is described by a [`ModuleDescriptor`]: where it lives in
//! the REST API, which fields to request when listing, and which fields of a
//! full definition carry embedded scripts. Fetching, grouping and pulling are
//! all driven by the descriptor, so adding a kind means adding a descriptor.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Group name used for modules without a `group` field
pub const UNGROUPED: &str = "Ungrouped";

/// The seven kinds of configuration module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleKind {
    DataSource,
    PropertySource,
    EventSource,
    ConfigSource,
    TopologySource,
    LogSource,
    Function,
}

/// Role of an embedded script; also the file stem it is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptRole {
    Discovery,
    Collection,
    Script,
}

impl ScriptRole {
    pub fn file_stem(&self) -> &'static str {
        match self {
            ScriptRole::Discovery => "discovery",
            ScriptRole::Collection => "collection",
            ScriptRole::Script => "script",
        }
    }
}

/// Location of one embedded script inside a module definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptField {
    pub role: ScriptRole,
    /// JSON pointer to the script body
    pub body: &'static str,
    /// JSON pointer to the declared script type
    pub script_type: &'static str,
}

/// Static description of one module kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub kind: ModuleKind,
    /// Collection endpoint relative to the API base
    pub endpoint: &'static str,
    /// Fields requested when listing
    pub fields: &'static [&'static str],
    pub script_fields: &'static [ScriptField],
}

const LIST_FIELDS: &[&str] = &["id", "name", "displayName", "group", "appliesTo"];

const AD_AND_COLLECTION: &[ScriptField] = &[
    ScriptField {
        role: ScriptRole::Discovery,
        body: "/autoDiscoveryConfig/method/groovyScript",
        script_type: "/autoDiscoveryConfig/method/scriptType",
    },
    ScriptField {
        role: ScriptRole::Collection,
        body: "/collectorAttribute/groovyScript",
        script_type: "/collectorAttribute/scriptType",
    },
];

static DESCRIPTORS: [ModuleDescriptor; 7] = [
    ModuleDescriptor {
        kind: ModuleKind::DataSource,
        endpoint: "/setting/datasources",
        fields: LIST_FIELDS,
        script_fields: AD_AND_COLLECTION,
    },
    ModuleDescriptor {
        kind: ModuleKind::PropertySource,
        endpoint: "/setting/propertyrules",
        fields: LIST_FIELDS,
        script_fields: &[ScriptField {
            role: ScriptRole::Script,
            body: "/groovyScript",
            script_type: "/scriptType",
        }],
    },
    ModuleDescriptor {
        kind: ModuleKind::EventSource,
        endpoint: "/setting/eventsources",
        fields: LIST_FIELDS,
        script_fields: &[ScriptField {
            role: ScriptRole::Collection,
            body: "/groovyScript",
            script_type: "/scriptType",
        }],
    },
    ModuleDescriptor {
        kind: ModuleKind::ConfigSource,
        endpoint: "/setting/configsources",
        fields: LIST_FIELDS,
        script_fields: AD_AND_COLLECTION,
    },
    ModuleDescriptor {
        kind: ModuleKind::TopologySource,
        endpoint: "/setting/topologysources",
        fields: LIST_FIELDS,
        script_fields: &[ScriptField {
            role: ScriptRole::Script,
            body: "/collectorAttribute/groovyScript",
            script_type: "/collectorAttribute/scriptType",
        }],
    },
    ModuleDescriptor {
        kind: ModuleKind::LogSource,
        endpoint: "/setting/logsources",
        fields: LIST_FIELDS,
        script_fields: &[ScriptField {
            role: ScriptRole::Script,
            body: "/collectionAttribute/script",
            script_type: "/collectionAttribute/scriptType",
        }],
    },
    ModuleDescriptor {
        kind: ModuleKind::Function,
        endpoint: "/setting/functions",
        fields: &["id", "name", "description"],
        script_fields: &[],
    },
];

impl ModuleKind {
    pub const ALL: [ModuleKind; 7] = [
        ModuleKind::DataSource,
        ModuleKind::PropertySource,
        ModuleKind::EventSource,
        ModuleKind::ConfigSource,
        ModuleKind::TopologySource,
        ModuleKind::LogSource,
        ModuleKind::Function,
    ];

    pub fn descriptor(&self) -> &'static ModuleDescriptor {
        // DESCRIPTORS follows declaration order
        &DESCRIPTORS[*self as usize]
    }

    /// Name written to the manifest's `moduleType`
    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleKind::DataSource => "DataSource",
            ModuleKind::PropertySource => "PropertySource",
            ModuleKind::EventSource => "EventSource",
            ModuleKind::ConfigSource => "ConfigSource",
            ModuleKind::TopologySource => "TopologySource",
            ModuleKind::LogSource => "LogSource",
            ModuleKind::Function => "Function",
        }
    }

    /// Directory name used in the local output layout
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModuleKind::DataSource => "datasources",
            ModuleKind::PropertySource => "propertysources",
            ModuleKind::EventSource => "eventsources",
            ModuleKind::ConfigSource => "configsources",
            ModuleKind::TopologySource => "topologysources",
            ModuleKind::LogSource => "logsources",
            ModuleKind::Function => "functions",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ModuleKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        let kind = match normalized.as_str() {
            "datasource" | "datasources" | "ds" => ModuleKind::DataSource,
            "propertysource" | "propertysources" | "propertyrules" => ModuleKind::PropertySource,
            "eventsource" | "eventsources" | "es" => ModuleKind::EventSource,
            "configsource" | "configsources" | "cs" => ModuleKind::ConfigSource,
            "topologysource" | "topologysources" | "ts" => ModuleKind::TopologySource,
            "logsource" | "logsources" | "ls" => ModuleKind::LogSource,
            "function" | "functions" => ModuleKind::Function,
            _ => return Err(ClientError::UnknownModuleKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// Module as returned by a list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub applies_to: Option<String>,
}

impl ModuleSummary {
    pub fn group_name(&self) -> &str {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(UNGROUPED)
    }
}

/// Group modules by their `group` field; groups and members sorted by name
pub fn group_modules(modules: Vec<ModuleSummary>) -> BTreeMap<String, Vec<ModuleSummary>> {
    let mut groups: BTreeMap<String, Vec<ModuleSummary>> = BTreeMap::new();
    for module in modules {
        groups
            .entry(module.group_name().to_string())
            .or_default()
            .push(module);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }
    groups
}
