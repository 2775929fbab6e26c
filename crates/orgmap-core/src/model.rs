//! Graph data model and the uniform response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of semantic categories a node may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Function,
    Department,
    Role,
    JobToBeDone,
    ValueCategory,
    ValueDriver,
    Agent,
    Persona,
    Workflow,
}

impl NodeType {
    /// All node types, in the relational dependency order used when
    /// assembling a snapshot (top-level entities before their dependents).
    pub const ALL: [NodeType; 9] = [
        NodeType::Function,
        NodeType::Department,
        NodeType::Role,
        NodeType::ValueCategory,
        NodeType::ValueDriver,
        NodeType::JobToBeDone,
        NodeType::Agent,
        NodeType::Persona,
        NodeType::Workflow,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Function => "function",
            NodeType::Department => "department",
            NodeType::Role => "role",
            NodeType::JobToBeDone => "job_to_be_done",
            NodeType::ValueCategory => "value_category",
            NodeType::ValueDriver => "value_driver",
            NodeType::Agent => "agent",
            NodeType::Persona => "persona",
            NodeType::Workflow => "workflow",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(NodeType::Function),
            "department" => Ok(NodeType::Department),
            "role" => Ok(NodeType::Role),
            "job_to_be_done" => Ok(NodeType::JobToBeDone),
            "value_category" => Ok(NodeType::ValueCategory),
            "value_driver" => Ok(NodeType::ValueDriver),
            "agent" => Ok(NodeType::Agent),
            "persona" => Ok(NodeType::Persona),
            "workflow" => Ok(NodeType::Workflow),
            other => Err(format!("unknown node type: {}", other)),
        }
    }
}

/// First-class relationship type labels. `Edge::rel_type` stays an open
/// string, but these are the relations the relational schema produces.
pub mod rel {
    /// function → department
    pub const OWNS: &str = "OWNS";
    /// department → role
    pub const HAS_ROLE: &str = "HAS_ROLE";
    /// role → job to be done
    pub const PERFORMS: &str = "PERFORMS";
    /// job to be done → value driver
    pub const DELIVERS: &str = "DELIVERS";
    /// value category → value driver
    pub const CONTAINS: &str = "CONTAINS";
    /// agent → job to be done
    pub const AUTOMATES: &str = "AUTOMATES";
    /// persona → role
    pub const EMBODIES: &str = "EMBODIES";
    /// workflow → job to be done
    pub const INCLUDES: &str = "INCLUDES";
}

/// Optional layout coordinates attached by a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Optional visual hints. Never interpreted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// A node in one materialized graph snapshot.
///
/// Ids are unique within a snapshot only; each fetch produces a fresh
/// snapshot that replaces (or is merged into) the prior one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl Node {
    /// Create a node with no properties, position, or style.
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            properties: BTreeMap::new(),
            position: None,
            style: None,
        }
    }

    /// Attach a property, consuming and returning the node.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A directed edge between two nodes of the same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "relationshipType")]
    pub rel_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl Edge {
    /// Create an edge; the id is derived deterministically from the triple,
    /// so identical relationships from different sources collide and dedup.
    pub fn new(source: impl Into<String>, rel_type: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let rel_type = rel_type.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &rel_type, &target),
            source,
            target,
            rel_type,
            label: None,
            properties: BTreeMap::new(),
        }
    }
}

/// Deterministic edge id: a pure function of `(source, rel_type, target)`.
pub fn edge_id(source: &str, rel_type: &str, target: &str) -> String {
    format!("{}--{}--{}", source, rel_type, target)
}

/// How a response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Live,
    Mock,
    Error,
    Semantic,
}

/// Envelope metadata carried by every adapter response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMeta {
    pub mode: ResponseMode,
    pub source: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The uniform response envelope returned by every adapter boundary,
/// on success and on failure alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub meta: GraphMeta,
}

impl GraphPayload {
    /// Successful payload; counts are derived from the collections.
    pub fn live(source: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self::with_mode(ResponseMode::Live, source, nodes, edges)
    }

    /// Payload with an explicit mode (mock, semantic).
    pub fn with_mode(
        mode: ResponseMode,
        source: impl Into<String>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        let meta = GraphMeta {
            mode,
            source: source.into(),
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            error: None,
        };
        Self { nodes, edges, meta }
    }

    /// Empty error payload. This is the only shape failures take across
    /// adapter boundaries.
    pub fn error(source: impl Into<String>, error: impl ToString) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            meta: GraphMeta {
                mode: ResponseMode::Error,
                source: source.into(),
                total_nodes: 0,
                total_edges: 0,
                error: Some(error.to_string()),
            },
        }
    }

    /// Whether this payload represents a failed call.
    pub fn is_error(&self) -> bool {
        self.meta.mode == ResponseMode::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_id_is_deterministic() {
        let a = edge_id("func-1", rel::OWNS, "dept-1");
        let b = edge_id("func-1", rel::OWNS, "dept-1");
        assert_eq!(a, b);
        assert_ne!(a, edge_id("func-1", rel::OWNS, "dept-2"));
        assert_ne!(a, edge_id("func-1", rel::HAS_ROLE, "dept-1"));
    }

    #[test]
    fn identical_edges_collide() {
        let e1 = Edge::new("a", rel::PERFORMS, "b");
        let e2 = Edge::new("a", rel::PERFORMS, "b");
        assert_eq!(e1.id, e2.id);
    }

    #[test]
    fn node_type_round_trips_through_str() {
        for t in NodeType::ALL {
            assert_eq!(t.as_str().parse::<NodeType>().unwrap(), t);
        }
    }

    #[test]
    fn envelope_serializes_with_wire_names() {
        let payload = GraphPayload::live(
            "relational",
            vec![Node::new("func-1", NodeType::Function, "Finance")],
            vec![],
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["meta"]["mode"], "live");
        assert_eq!(json["meta"]["totalNodes"], 1);
        assert_eq!(json["nodes"][0]["type"], "function");
    }

    #[test]
    fn error_payload_is_empty_and_flagged() {
        let payload = GraphPayload::error("neo4j", "connection refused");
        assert!(payload.is_error());
        assert!(payload.nodes.is_empty());
        assert_eq!(payload.meta.error.as_deref(), Some("connection refused"));
    }
}
