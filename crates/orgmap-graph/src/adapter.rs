//! Native graph adapter.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use neo4rs::Query;
use tracing::debug;

use orgmap_core::model::{Edge, GraphPayload, Node, NodeType};
use orgmap_core::source::{FetchRequest, GraphSource};
use orgmap_core::typemap;

use crate::client::GraphClient;
use crate::guard::ensure_read_only;
use crate::normalize::{
    edge_from_row, id_projection, name_projection, node_from_row, projection_mismatch,
};

/// Provenance name stamped on this adapter's envelopes.
pub const SOURCE_NAME: &str = "neo4j";

/// Read-only adapter over the Neo4j ontology graph.
///
/// Three query modes, chosen from the request: a raw read-only traversal
/// when `raw_query` is set, a neighbor query when `focus_node_id` is set,
/// and a breadth query over the requested types otherwise. Raw traversals
/// must project nodes as `id` / `labels` / `name` (/ `description`)
/// columns and relationships as `source` / `target` / `rel_type`; other
/// columns are ignored. A traversal whose rows project none of those
/// columns is reported as an error, not an empty result.
pub struct NativeGraphAdapter {
    client: GraphClient,
}

impl NativeGraphAdapter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Connect using environment configuration. Missing credentials fail
    /// fast here, before any query is attempted.
    pub async fn from_env() -> Result<Self> {
        let config = crate::client::GraphConfig::from_env()?;
        Ok(Self::new(GraphClient::connect(&config).await?))
    }

    async fn run(&self, request: &FetchRequest) -> Result<GraphPayload> {
        let limit = request.limit;

        let (nodes, edges) = if let Some(raw) = &request.raw_query {
            self.raw(raw).await?
        } else if let Some(focus) = &request.focus_node_id {
            self.neighbors(focus, limit).await?
        } else {
            self.breadth(&request.types, limit).await?
        };

        Ok(finish(nodes, edges))
    }

    /// Execute a caller-supplied read-only traversal. The guard has
    /// already vetted the expression by the time this runs.
    async fn raw(&self, raw: &str) -> Result<(Vec<Node>, Vec<Edge>)> {
        let rows = self.client.query(Query::new(raw.to_string())).await?;

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for row in &rows {
            if let Some(node) = node_from_row(row) {
                nodes.push(node);
            }
            if let Some(edge) = edge_from_row(row) {
                edges.push(edge);
            }
        }
        if projection_mismatch(rows.len(), nodes.len(), edges.len()) {
            anyhow::bail!(
                "raw traversal returned {} row(s) without projected columns; \
                 return nodes as `id`, `labels`, `name` and relationships as \
                 `source`, `target`, `rel_type`",
                rows.len()
            );
        }
        debug!(rows = rows.len(), "Normalized raw traversal result");
        Ok((nodes, edges))
    }

    /// One-hop neighborhood around a node, the node itself included.
    async fn neighbors(&self, focus: &str, limit: usize) -> Result<(Vec<Node>, Vec<Edge>)> {
        let node_query = Query::new(format!(
            "MATCH (start {{id: $id}})
             MATCH (start)-[*0..1]-(nb)
             WITH DISTINCT nb
             RETURN {} AS id, labels(nb) AS labels,
                    {} AS name, nb.description AS description
             LIMIT {}",
            id_projection("nb"),
            name_projection("nb"),
            limit
        ))
        .param("id", focus);

        let mut nodes = Vec::new();
        for row in self.client.query(node_query).await? {
            if let Some(node) = node_from_row(&row) {
                nodes.push(node);
            }
        }

        let rel_query = Query::new(format!(
            "MATCH (start {{id: $id}})-[r]-(nb)
             RETURN DISTINCT {} AS source, {} AS target, type(r) AS rel_type
             LIMIT {}",
            id_projection("startNode(r)"),
            id_projection("endNode(r)"),
            limit * 2
        ))
        .param("id", focus);

        let mut edges = Vec::new();
        for row in self.client.query(rel_query).await? {
            if let Some(edge) = edge_from_row(&row) {
                edges.push(edge);
            }
        }

        Ok((nodes, edges))
    }

    /// Breadth query: nodes of the requested types plus the relationships
    /// among whatever was collected. The request limit caps the total node
    /// count; each label query only gets the budget left by the ones
    /// before it.
    async fn breadth(&self, types: &[NodeType], limit: usize) -> Result<(Vec<Node>, Vec<Edge>)> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let label_clauses: Vec<String> = if types.is_empty() {
            vec![String::new()]
        } else {
            types.iter().map(|t| format!(":{}", typemap::type_to_label(*t))).collect()
        };

        for clause in &label_clauses {
            let budget = node_budget(limit, nodes.len());
            if budget == 0 {
                break;
            }
            let node_query = Query::new(format!(
                "MATCH (n{})
                 RETURN {} AS id, labels(n) AS labels,
                        {} AS name, n.description AS description
                 ORDER BY name
                 LIMIT {}",
                clause,
                id_projection("n"),
                name_projection("n"),
                budget
            ));
            for row in self.client.query(node_query).await? {
                if let Some(node) = node_from_row(&row) {
                    nodes.push(node);
                }
            }

            let rel_query = Query::new(format!(
                "MATCH (n{})-[r]->(m)
                 RETURN DISTINCT {} AS source, {} AS target, type(r) AS rel_type
                 LIMIT {}",
                clause,
                id_projection("n"),
                id_projection("m"),
                limit * 2
            ));
            for row in self.client.query(rel_query).await? {
                if let Some(edge) = edge_from_row(&row) {
                    edges.push(edge);
                }
            }
        }

        Ok((nodes, edges))
    }
}

#[async_trait]
impl GraphSource for NativeGraphAdapter {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, request: &FetchRequest) -> GraphPayload {
        // Reject mutating traversals before anything touches the wire.
        if let Some(raw) = &request.raw_query {
            if let Err(rejection) = ensure_read_only(raw) {
                return GraphPayload::error(SOURCE_NAME, rejection);
            }
        }

        match self.run(request).await {
            Ok(payload) => payload,
            Err(e) => GraphPayload::error(SOURCE_NAME, e),
        }
    }
}

/// Node budget left for the next label query. Typed breadth requests
/// share one limit across all requested labels, matching the cap an
/// untyped request gets.
fn node_budget(limit: usize, collected: usize) -> usize {
    limit.saturating_sub(collected)
}

/// Dedup by normalized id and drop edges whose endpoints did not survive.
fn finish(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphPayload {
    let mut seen_nodes: HashSet<String> = HashSet::new();
    let nodes: Vec<Node> = nodes
        .into_iter()
        .filter(|n| seen_nodes.insert(n.id.clone()))
        .collect();

    let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen_edges: HashSet<String> = HashSet::new();
    let edges: Vec<Edge> = edges
        .into_iter()
        .filter(|e| present.contains(e.source.as_str()) && present.contains(e.target.as_str()))
        .filter(|e| seen_edges.insert(e.id.clone()))
        .collect();

    GraphPayload::live(SOURCE_NAME, nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgmap_core::model::rel;

    #[test]
    fn finish_dedups_and_drops_dangling() {
        let nodes = vec![
            Node::new("a", NodeType::Function, "A"),
            Node::new("a", NodeType::Function, "A again"),
            Node::new("b", NodeType::Department, "B"),
        ];
        let edges = vec![
            Edge::new("a", rel::OWNS, "b"),
            Edge::new("a", rel::OWNS, "b"),
            Edge::new("a", rel::OWNS, "ghost"),
        ];

        let payload = finish(nodes, edges);
        assert_eq!(payload.nodes.len(), 2);
        assert_eq!(payload.edges.len(), 1);
        assert_eq!(payload.meta.total_nodes, 2);
    }

    #[test]
    fn breadth_budget_is_shared_across_labels() {
        assert_eq!(node_budget(50, 0), 50);
        assert_eq!(node_budget(50, 48), 2);
        assert_eq!(node_budget(50, 50), 0);
        // Over-collection still reports an exhausted budget.
        assert_eq!(node_budget(50, 60), 0);
    }
}
