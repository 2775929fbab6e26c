//! Multi-source aggregation engine.
//!
//! Fans out one fetch to every registered source, merges the successes
//! with first-seen-wins deduplication, and substitutes the deterministic
//! fallback dataset when nothing usable comes back.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::fallback;
use crate::model::{Edge, GraphPayload, GraphMeta, Node, ResponseMode};
use crate::source::{FetchRequest, GraphSource};

/// Provenance stamped on merges with more than one contributing source.
pub const COMBINED_SOURCE: &str = "combined";

/// Aggregates graph payloads from an ordered set of sources.
///
/// Registration order is priority order: on a node-id collision the source
/// registered (and therefore merged) first keeps the node.
pub struct Aggregator {
    sources: Vec<Arc<dyn GraphSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn GraphSource>>) -> Self {
        Self { sources }
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch from every source concurrently and merge the results.
    ///
    /// A failing source is logged and excluded from the merge; as long as
    /// one source contributes nodes the aggregation succeeds. If every
    /// source fails or returns zero nodes, the fallback dataset is
    /// substituted so the caller never receives an empty graph.
    pub async fn fetch(&self, request: &FetchRequest) -> GraphPayload {
        let calls = self.sources.iter().map(|source| source.fetch(request));
        // join_all keeps registration order, which first-seen-wins relies on.
        let payloads = join_all(calls).await;

        let mut contributing: Vec<String> = Vec::new();
        let mut nodes: Vec<Node> = Vec::new();
        let mut seen_nodes: HashSet<String> = HashSet::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut seen_edges: HashSet<String> = HashSet::new();

        for (source, payload) in self.sources.iter().zip(payloads) {
            if payload.is_error() {
                warn!(
                    source = source.name(),
                    error = payload.meta.error.as_deref().unwrap_or("unknown"),
                    "Source failed during aggregation; excluding from merge"
                );
                continue;
            }
            if payload.nodes.is_empty() {
                debug!(source = source.name(), "Source returned no nodes");
                continue;
            }

            contributing.push(payload.meta.source.clone());
            for node in payload.nodes {
                if seen_nodes.insert(node.id.clone()) {
                    nodes.push(node);
                }
            }
            for edge in payload.edges {
                if seen_edges.insert(edge.id.clone()) {
                    edges.push(edge);
                }
            }
        }

        if contributing.is_empty() {
            warn!("All sources failed or returned nothing; serving fallback dataset");
            return fallback::sample_graph();
        }

        // A merged edge survives only if both endpoints survived the merge.
        edges.retain(|edge| seen_nodes.contains(&edge.source) && seen_nodes.contains(&edge.target));

        let source = if contributing.len() >= 2 {
            COMBINED_SOURCE.to_string()
        } else {
            contributing.remove(0)
        };

        debug!(
            source = source.as_str(),
            nodes = nodes.len(),
            edges = edges.len(),
            "Merged aggregation result"
        );

        let meta = GraphMeta {
            mode: ResponseMode::Live,
            source,
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            error: None,
        };
        GraphPayload { nodes, edges, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{rel, NodeType};
    use async_trait::async_trait;

    /// Source returning a fixed payload, used to script merge scenarios.
    struct StubSource {
        name: &'static str,
        payload: GraphPayload,
    }

    #[async_trait]
    impl GraphSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _request: &FetchRequest) -> GraphPayload {
            self.payload.clone()
        }
    }

    fn stub(name: &'static str, payload: GraphPayload) -> Arc<dyn GraphSource> {
        Arc::new(StubSource { name, payload })
    }

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter()
            .map(|id| Node::new(*id, NodeType::Function, *id))
            .collect()
    }

    #[tokio::test]
    async fn overlapping_ids_keep_first_seen() {
        let first = stub(
            "relational",
            GraphPayload::live("relational", nodes(&["a", "b"]), vec![]),
        );
        let mut shadowed = Node::new("b", NodeType::Agent, "other-b");
        shadowed = shadowed.with_property("from", "neo4j");
        let second = stub(
            "neo4j",
            GraphPayload::live("neo4j", vec![shadowed, Node::new("c", NodeType::Role, "c")], vec![]),
        );

        let merged = Aggregator::new(vec![first, second])
            .fetch(&FetchRequest::all())
            .await;

        assert_eq!(merged.nodes.len(), 3);
        let b = merged.nodes.iter().find(|n| n.id == "b").unwrap();
        assert_eq!(b.node_type, NodeType::Function, "first source keeps the id");
        assert_eq!(merged.meta.source, COMBINED_SOURCE);
        assert_eq!(merged.meta.mode, ResponseMode::Live);
    }

    #[tokio::test]
    async fn failing_source_does_not_poison_the_merge() {
        let ids: Vec<String> = (0..10).map(|i| format!("func-{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let ok = stub(
            "relational",
            GraphPayload::live("relational", nodes(&id_refs), vec![]),
        );
        let broken = stub("neo4j", GraphPayload::error("neo4j", "connection refused"));

        let merged = Aggregator::new(vec![ok, broken])
            .fetch(&FetchRequest::all())
            .await;

        assert_eq!(merged.nodes.len(), 10);
        assert_eq!(merged.meta.source, "relational");
        assert_eq!(merged.meta.mode, ResponseMode::Live);
    }

    #[tokio::test]
    async fn total_failure_serves_the_fallback_dataset() {
        let a = stub("relational", GraphPayload::error("relational", "db missing"));
        let b = stub("neo4j", GraphPayload::live("neo4j", vec![], vec![]));

        let merged = Aggregator::new(vec![a, b]).fetch(&FetchRequest::all()).await;

        assert_eq!(merged.meta.mode, ResponseMode::Mock);
        assert_eq!(merged.meta.source, fallback::FALLBACK_SOURCE);
        assert!(!merged.nodes.is_empty());
    }

    #[tokio::test]
    async fn merged_edges_are_deduplicated_and_anchored() {
        let shared_edge = Edge::new("a", rel::OWNS, "b");
        let dangling = Edge::new("a", rel::OWNS, "ghost");
        let first = stub(
            "relational",
            GraphPayload::live("relational", nodes(&["a", "b"]), vec![shared_edge.clone()]),
        );
        let second = stub(
            "neo4j",
            GraphPayload::live("neo4j", nodes(&["a"]), vec![shared_edge, dangling]),
        );

        let merged = Aggregator::new(vec![first, second])
            .fetch(&FetchRequest::all())
            .await;

        assert_eq!(merged.edges.len(), 1, "duplicate collapsed, dangling dropped");
        assert_eq!(merged.meta.total_edges, 1);
    }

    #[tokio::test]
    async fn single_contributor_keeps_its_identity() {
        let only = stub(
            "relational",
            GraphPayload::live("relational", nodes(&["a"]), vec![]),
        );
        let merged = Aggregator::new(vec![only]).fetch(&FetchRequest::all()).await;
        assert_eq!(merged.meta.source, "relational");
    }
}
