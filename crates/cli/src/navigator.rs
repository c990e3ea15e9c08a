//! TreeNavigator - walk a portal's inventory and module catalog
//!
//! Children of remote nodes are fetched once and cached by node key for the
//! lifetime of the navigator; `refresh` drops the cache.

use gateway::{api, ApiTransport};
use modules::list_grouped;
use shared::{NavNode, Result};
use std::collections::HashMap;
use tracing::debug;

/// Fetch the children of a node
pub async fn resolve_children<T>(transport: &T, node: &NavNode, page_size: usize) -> Result<Vec<NavNode>>
where
    T: ApiTransport + ?Sized,
{
    if let Some(children) = node.local_children() {
        return Ok(children);
    }

    let portal = node.portal().to_string();
    let children = match node {
        NavNode::Portal { .. } => {
            let mut nodes: Vec<NavNode> = api::list_collector_groups(transport, page_size)
                .await?
                .into_iter()
                .map(|group| NavNode::CollectorGroup {
                    portal: portal.clone(),
                    group,
                })
                .collect();
            nodes.push(NavNode::ModuleCatalog { portal });
            nodes
        }
        NavNode::CollectorGroup { group, .. } => {
            api::list_collectors(transport, Some(group.id), page_size)
                .await?
                .into_iter()
                .map(|collector| NavNode::Collector {
                    portal: portal.clone(),
                    collector,
                })
                .collect()
        }
        NavNode::Collector { collector, .. } => {
            api::list_devices_for_collector(transport, collector.id, page_size)
                .await?
                .into_iter()
                .map(|device| NavNode::Device {
                    portal: portal.clone(),
                    device,
                })
                .collect()
        }
        NavNode::ModuleKindFolder { kind, .. } => list_grouped(transport, *kind, page_size)
            .await?
            .into_iter()
            .map(|(name, modules)| NavNode::ModuleGroup {
                portal: portal.clone(),
                kind: *kind,
                name,
                modules,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(children)
}

#[derive(Debug)]
pub struct TreeNavigator {
    path: Vec<NavNode>,
    cache: HashMap<String, Vec<NavNode>>,
    page_size: usize,
}

impl TreeNavigator {
    pub fn new(portal: impl Into<String>, page_size: usize) -> Self {
        Self {
            path: vec![NavNode::Portal {
                portal: portal.into(),
            }],
            cache: HashMap::new(),
            page_size,
        }
    }

    pub fn current(&self) -> &NavNode {
        // path always holds at least the portal root
        &self.path[self.path.len() - 1]
    }

    /// Nodes from the root down to the current node
    pub fn path(&self) -> &[NavNode] {
        &self.path
    }

    /// Nearest collector above or at the current node
    pub fn enclosing_collector(&self) -> Option<&shared::Collector> {
        self.path.iter().rev().find_map(|node| match node {
            NavNode::Collector { collector, .. } => Some(collector),
            _ => None,
        })
    }

    pub fn breadcrumb(&self) -> String {
        self.path
            .iter()
            .map(NavNode::label)
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Children of the current node, from cache when available
    pub async fn children<T>(&mut self, transport: &T) -> Result<Vec<NavNode>>
    where
        T: ApiTransport + ?Sized,
    {
        let key = self.current().cache_key();
        if let Some(children) = self.cache.get(&key) {
            debug!(key = %key, "children from cache");
            return Ok(children.clone());
        }
        let children = resolve_children(transport, self.current(), self.page_size).await?;
        self.cache.insert(key, children.clone());
        Ok(children)
    }

    /// Descend into the child at `index`; `None` when out of range
    pub async fn enter<T>(&mut self, transport: &T, index: usize) -> Result<Option<&NavNode>>
    where
        T: ApiTransport + ?Sized,
    {
        let children = self.children(transport).await?;
        match children.into_iter().nth(index) {
            Some(child) => {
                self.path.push(child);
                Ok(Some(self.current()))
            }
            None => Ok(None),
        }
    }

    /// Go to the parent; false at the root
    pub fn up(&mut self) -> bool {
        if self.path.len() > 1 {
            self.path.pop();
            true
        } else {
            false
        }
    }

    pub fn refresh(&mut self) {
        self.cache.clear();
    }

    pub fn cached_nodes(&self) -> usize {
        self.cache.len()
    }
}
