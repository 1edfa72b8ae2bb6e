//! Roadmap graph model: typed nodes and links plus the builder that turns an
//! article outline into them.
//!
//! A graph is created fresh and atomically on every successful build and is
//! never mutated in place; selecting a new topic replaces the previous graph
//! wholesale.

mod builder;

pub use builder::{build_graph, clean_label};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Reserved id of the single main node every graph carries.
pub const MAIN_NODE_ID: &str = "main";

/// Node category, drives rendering weight and click behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The article itself; exactly one per graph, id [`MAIN_NODE_ID`].
    Main,
    /// Hierarchy section of the article outline.
    Section,
    /// Related-topic cross-reference; clickable to re-explore.
    Topic,
}

/// Link category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// Structural link inside the outline hierarchy.
    Section,
    /// Link to or between related topics.
    Related,
}

/// One graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    /// Visual weight (> 0); feeds the layout mass and marker size.
    pub weight: f32,
    pub kind: NodeKind,
    /// Opaque article reference carried by clickable topic nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
}

/// One typed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source_id: String,
    pub target_id: String,
    pub weight: f32,
    pub kind: LinkKind,
}

/// The roadmap graph: nodes with unique ids plus typed links whose endpoints
/// all exist in the node set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The main node. Present in every graph the builder produces.
    pub fn main_node(&self) -> Option<&Node> {
        self.node(MAIN_NODE_ID)
    }

    /// Check referential integrity: every link endpoint names an existing
    /// node and node ids are unique. Holds by construction after every
    /// build; exposed for tests and debug assertions.
    pub fn validate_links(&self) -> bool {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return false;
            }
        }
        self.links
            .iter()
            .all(|l| ids.contains(l.source_id.as_str()) && ids.contains(l.target_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind) -> Node {
        Node {
            id: id.to_string(),
            label: id.to_string(),
            weight: 8.0,
            kind,
            external_ref: None,
        }
    }

    #[test]
    fn test_validate_links_accepts_well_formed_graph() {
        let graph = Graph {
            nodes: vec![node("main", NodeKind::Main), node("s1", NodeKind::Section)],
            links: vec![Link {
                source_id: "main".to_string(),
                target_id: "s1".to_string(),
                weight: 2.0,
                kind: LinkKind::Section,
            }],
        };
        assert!(graph.validate_links());
    }

    #[test]
    fn test_validate_links_rejects_dangling_endpoint() {
        let graph = Graph {
            nodes: vec![node("main", NodeKind::Main)],
            links: vec![Link {
                source_id: "main".to_string(),
                target_id: "ghost".to_string(),
                weight: 2.0,
                kind: LinkKind::Section,
            }],
        };
        assert!(!graph.validate_links());
    }

    #[test]
    fn test_validate_links_rejects_duplicate_node_ids() {
        let graph = Graph {
            nodes: vec![node("s1", NodeKind::Section), node("s1", NodeKind::Section)],
            links: vec![],
        };
        assert!(!graph.validate_links());
    }

    #[test]
    fn test_node_kind_serializes_lowercase() {
        let json = serde_json::to_string(&NodeKind::Topic).unwrap();
        assert_eq!(json, "\"topic\"");
    }
}
