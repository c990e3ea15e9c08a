//! Navigable tree nodes
//!
//! Each node carries the entity it stands for, so selecting or pulling from a
//! node never has to decode ids back out of a display string.

use crate::inventory::{Collector, CollectorGroup, Device};
use crate::module::{ModuleKind, ModuleSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    Portal {
        portal: String,
    },
    CollectorGroup {
        portal: String,
        group: CollectorGroup,
    },
    Collector {
        portal: String,
        collector: Collector,
    },
    Device {
        portal: String,
        device: Device,
    },
    /// Folder holding one entry per module kind
    ModuleCatalog {
        portal: String,
    },
    ModuleKindFolder {
        portal: String,
        kind: ModuleKind,
    },
    /// Modules sharing a `group` value; members are already loaded
    ModuleGroup {
        portal: String,
        kind: ModuleKind,
        name: String,
        modules: Vec<ModuleSummary>,
    },
    Module {
        portal: String,
        kind: ModuleKind,
        module: ModuleSummary,
    },
}

impl NavNode {
    pub fn portal(&self) -> &str {
        match self {
            NavNode::Portal { portal }
            | NavNode::CollectorGroup { portal, .. }
            | NavNode::Collector { portal, .. }
            | NavNode::Device { portal, .. }
            | NavNode::ModuleCatalog { portal }
            | NavNode::ModuleKindFolder { portal, .. }
            | NavNode::ModuleGroup { portal, .. }
            | NavNode::Module { portal, .. } => portal,
        }
    }

    pub fn label(&self) -> String {
        match self {
            NavNode::Portal { portal } => portal.clone(),
            NavNode::CollectorGroup { group, .. } => group.name.clone(),
            NavNode::Collector { collector, .. } => {
                if collector.is_down {
                    format!("{} [down]", collector.label())
                } else {
                    collector.label()
                }
            }
            NavNode::Device { device, .. } => device.label(),
            NavNode::ModuleCatalog { .. } => "Modules".to_string(),
            NavNode::ModuleKindFolder { kind, .. } => format!("{}s", kind.type_name()),
            NavNode::ModuleGroup { name, modules, .. } => format!("{} ({})", name, modules.len()),
            NavNode::Module { module, .. } => format!("#{} {}", module.id, module.name),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NavNode::Device { .. } | NavNode::Module { .. })
    }

    /// Stable key for caching a node's children
    pub fn cache_key(&self) -> String {
        let portal = self.portal();
        match self {
            NavNode::Portal { .. } => format!("{}/", portal),
            NavNode::CollectorGroup { group, .. } => format!("{}/group/{}", portal, group.id),
            NavNode::Collector { collector, .. } => {
                format!("{}/collector/{}", portal, collector.id)
            }
            NavNode::Device { device, .. } => format!("{}/device/{}", portal, device.id),
            NavNode::ModuleCatalog { .. } => format!("{}/modules", portal),
            NavNode::ModuleKindFolder { kind, .. } => {
                format!("{}/modules/{}", portal, kind.dir_name())
            }
            NavNode::ModuleGroup { kind, name, .. } => {
                format!("{}/modules/{}/{}", portal, kind.dir_name(), name)
            }
            NavNode::Module { kind, module, .. } => {
                format!("{}/modules/{}/#{}", portal, kind.dir_name(), module.id)
            }
        }
    }

    /// Children that need no remote call, if any
    pub fn local_children(&self) -> Option<Vec<NavNode>> {
        match self {
            NavNode::ModuleCatalog { portal } => Some(
                ModuleKind::ALL
                    .iter()
                    .map(|kind| NavNode::ModuleKindFolder {
                        portal: portal.clone(),
                        kind: *kind,
                    })
                    .collect(),
            ),
            NavNode::ModuleGroup {
                portal,
                kind,
                modules,
                ..
            } => Some(
                modules
                    .iter()
                    .map(|module| NavNode::Module {
                        portal: portal.clone(),
                        kind: *kind,
                        module: module.clone(),
                    })
                    .collect(),
            ),
            NavNode::Device { .. } | NavNode::Module { .. } => Some(Vec::new()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: u64, name: &str) -> ModuleSummary {
        ModuleSummary {
            id,
            name: name.to_string(),
            display_name: None,
            group: Some("Net".to_string()),
            applies_to: None,
        }
    }

    #[test]
    fn test_catalog_children_cover_all_kinds() {
        let node = NavNode::ModuleCatalog {
            portal: "prod".to_string(),
        };
        let children = node.local_children().unwrap();
        assert_eq!(children.len(), 7);
        assert!(children.iter().all(|c| c.portal() == "prod"));
    }

    #[test]
    fn test_group_children_carry_entities() {
        let node = NavNode::ModuleGroup {
            portal: "prod".to_string(),
            kind: ModuleKind::EventSource,
            name: "Net".to_string(),
            modules: vec![module(5, "Syslog"), module(6, "Traps")],
        };
        assert_eq!(node.label(), "Net (2)");
        let children = node.local_children().unwrap();
        match &children[1] {
            NavNode::Module { kind, module, .. } => {
                assert_eq!(*kind, ModuleKind::EventSource);
                assert_eq!(module.id, 6);
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_remote_nodes_have_no_local_children() {
        let node = NavNode::Portal {
            portal: "prod".to_string(),
        };
        assert!(node.local_children().is_none());
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_cache_keys_are_distinct_per_portal() {
        let a = NavNode::ModuleKindFolder {
            portal: "a".to_string(),
            kind: ModuleKind::DataSource,
        };
        let b = NavNode::ModuleKindFolder {
            portal: "b".to_string(),
            kind: ModuleKind::DataSource,
        };
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "a/modules/datasources");
    }
}
