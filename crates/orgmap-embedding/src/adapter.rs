//! Similarity adapter.
//!
//! Embeds the query text, searches the vector index, and maps surviving
//! hits to nodes. Node-level only: the payload never carries edges, and
//! the caller is responsible for intersecting any retained edges against
//! the unioned node set.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use orgmap_core::model::{GraphPayload, Node, ResponseMode};
use orgmap_core::source::{SemanticRequest, SemanticSource};
use orgmap_core::typemap;

use crate::ollama::OllamaClient;
use crate::qdrant::{collection_for, SimilarityHit, SimilarityStore};

/// Provenance name stamped on this adapter's envelopes.
pub const SOURCE_NAME: &str = "qdrant";

/// Semantic search over the ontology's vector index.
pub struct SimilarityAdapter {
    ollama: OllamaClient,
    store: SimilarityStore,
}

impl SimilarityAdapter {
    pub fn new(ollama: OllamaClient, store: SimilarityStore) -> Self {
        Self { ollama, store }
    }

    /// Build from environment configuration.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ollama: OllamaClient::new(crate::ollama::EmbeddingConfig::from_env()),
            store: SimilarityStore::from_env()?,
        })
    }

    async fn run(&self, request: &SemanticRequest) -> Result<Vec<Node>> {
        let query_vector = self.ollama.embed_query(&request.query_text).await?;

        let type_names: Vec<&str> = request.types.iter().map(|t| t.as_str()).collect();
        let collection = collection_for(request.namespace.as_deref());
        let hits = self
            .store
            .search(
                &collection,
                query_vector,
                request.top_k,
                request.min_score,
                &type_names,
            )
            .await?;

        debug!(
            query = request.query_text.as_str(),
            hits = hits.len(),
            "Semantic search hits above threshold"
        );
        Ok(hits.iter().map(hit_to_node).collect())
    }
}

#[async_trait]
impl SemanticSource for SimilarityAdapter {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, request: &SemanticRequest) -> GraphPayload {
        match self.run(request).await {
            Ok(nodes) => GraphPayload::with_mode(ResponseMode::Semantic, SOURCE_NAME, nodes, Vec::new()),
            Err(e) => GraphPayload::error(SOURCE_NAME, e),
        }
    }
}

/// Map one index hit to a node.
///
/// The node id prefers the payload's `id` field over the raw point id,
/// the display label falls back through `name` / `title` / `content`,
/// and the node type runs through the inference cascade. The similarity
/// score rides along as a property.
fn hit_to_node(hit: &SimilarityHit) -> Node {
    let payload = &hit.payload;
    let id = payload
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(&hit.id)
        .to_string();

    let label = ["name", "title", "content"]
        .iter()
        .find_map(|field| payload.get(*field).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .unwrap_or(&id)
        .to_string();

    let node_type = typemap::infer_node_type(payload, &id);

    let mut node = Node::new(id, node_type, label).with_property("score", hit.score as f64);
    if let Value::Object(map) = payload {
        for (key, value) in map {
            node.properties.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgmap_core::model::NodeType;
    use serde_json::json;

    fn hit(id: &str, score: f32, payload: serde_json::Value) -> SimilarityHit {
        SimilarityHit {
            id: id.to_string(),
            score,
            payload,
        }
    }

    #[test]
    fn payload_id_wins_over_point_id() {
        let node = hit_to_node(&hit(
            "9231",
            0.82,
            json!({"id": "role-7", "name": "Controller"}),
        ));
        assert_eq!(node.id, "role-7");
        assert_eq!(node.label, "Controller");
        assert_eq!(node.node_type, NodeType::Role);
    }

    #[test]
    fn point_id_and_content_fill_the_gaps() {
        let node = hit_to_node(&hit("9231", 0.5, json!({"content": "month end close"})));
        assert_eq!(node.id, "9231");
        assert_eq!(node.label, "month end close");
        assert_eq!(node.node_type, typemap::DEFAULT_NODE_TYPE);
    }

    #[test]
    fn explicit_type_metadata_is_honored() {
        let node = hit_to_node(&hit("1", 0.9, json!({"id": "x", "node_type": "workflow"})));
        assert_eq!(node.node_type, NodeType::Workflow);
    }

    #[test]
    fn score_lands_in_properties() {
        let node = hit_to_node(&hit("1", 0.75, json!({"id": "agent-1"})));
        let score = node.properties.get("score").and_then(Value::as_f64).unwrap();
        assert!((score - 0.75).abs() < 1e-6);
    }
}
