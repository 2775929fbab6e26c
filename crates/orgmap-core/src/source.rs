//! Source traits implemented by the backing-store adapters.

use async_trait::async_trait;

use crate::model::{GraphPayload, NodeType};

/// Default per-call result limit applied when a request leaves it unset.
pub const DEFAULT_LIMIT: usize = 50;

/// Parameters for a graph fetch against a structural source.
///
/// Relational sources read `types`, `scope`, and `limit`; the native graph
/// source additionally honors `focus_node_id` (neighbor query) and
/// `raw_query` (guarded read-only traversal). Unknown fields are ignored by
/// sources they do not apply to.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Requested node types; empty means all.
    pub types: Vec<NodeType>,
    /// Optional organization scope filter.
    pub scope: Option<String>,
    /// Center of a neighbor query, when set.
    pub focus_node_id: Option<String>,
    /// Raw read-only traversal expression, when set.
    pub raw_query: Option<String>,
    /// Per-entity-kind limit for relational sources; total result limit
    /// for the native graph source.
    pub limit: usize,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            scope: None,
            focus_node_id: None,
            raw_query: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FetchRequest {
    /// Request all node types with default limits.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict the request to the given types.
    pub fn with_types(mut self, types: Vec<NodeType>) -> Self {
        self.types = types;
        self
    }

    /// Whether a type passes the request's type filter.
    pub fn wants(&self, node_type: NodeType) -> bool {
        self.types.is_empty() || self.types.contains(&node_type)
    }
}

/// Parameters for a semantic similarity search.
#[derive(Debug, Clone)]
pub struct SemanticRequest {
    pub query_text: String,
    pub top_k: u64,
    /// Matches scoring below this are discarded.
    pub min_score: f32,
    /// Optional type filter applied at the index.
    pub types: Vec<NodeType>,
    /// Optional index namespace.
    pub namespace: Option<String>,
}

impl SemanticRequest {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            top_k: 10,
            min_score: 0.35,
            types: Vec::new(),
            namespace: None,
        }
    }
}

/// A structural graph source: returns nodes and edges.
///
/// Implementations never return `Err` and never panic across this boundary;
/// every failure is folded into a `mode = error` envelope.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Stable identity used for provenance and logging.
    fn name(&self) -> &'static str;

    async fn fetch(&self, request: &FetchRequest) -> GraphPayload;
}

/// A similarity source: returns nodes only, never edges.
#[async_trait]
pub trait SemanticSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, request: &SemanticRequest) -> GraphPayload;
}
