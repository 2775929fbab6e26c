//! Qdrant vector search.
//!
//! Search-only client: the similarity adapter never writes to the index.
//! Collections hold one point per ontology node with its text embedding
//! and a payload carrying the node's id, name, and type hints.

use anyhow::{Context, Result};
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{value::Kind, Condition, Filter, SearchPointsBuilder, Value};
use qdrant_client::Qdrant;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the Qdrant gRPC URL.
pub const QDRANT_URL_ENV: &str = "ORGMAP_QDRANT_URL";

/// Default Qdrant gRPC URL.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection holding ontology node vectors.
pub const NODES_COLLECTION: &str = "orgmap_nodes";

/// A scored match from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityHit {
    pub id: String,
    pub score: f32,
    pub payload: serde_json::Value,
}

/// Qdrant similarity store.
#[derive(Clone)]
pub struct SimilarityStore {
    client: Qdrant,
}

impl SimilarityStore {
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .context("Failed to create Qdrant client")?;
        Ok(Self { client })
    }

    /// Create a store from `ORGMAP_QDRANT_URL`, defaulting to localhost.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(QDRANT_URL_ENV).unwrap_or_else(|_| DEFAULT_QDRANT_URL.to_string());
        Self::new(&url)
    }

    /// Nearest-neighbor search.
    ///
    /// Matches scoring below `min_score` are cut off inside the index;
    /// `type_filter` restricts hits to payloads whose `node_type` field
    /// matches any of the given names.
    pub async fn search(
        &self,
        collection: &str,
        query_vector: Vec<f32>,
        top_k: u64,
        min_score: f32,
        type_filter: &[&str],
    ) -> Result<Vec<SimilarityHit>> {
        let mut builder = SearchPointsBuilder::new(collection, query_vector, top_k)
            .with_payload(true)
            .score_threshold(min_score);

        if !type_filter.is_empty() {
            let conditions: Vec<Condition> = type_filter
                .iter()
                .map(|name| Condition::matches("node_type", name.to_string()))
                .collect();
            builder = builder.filter(Filter::should(conditions));
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .context("Failed to search points")?;

        let hits: Vec<SimilarityHit> = response
            .result
            .into_iter()
            .map(|point| SimilarityHit {
                id: point.id.and_then(point_id_string).unwrap_or_default(),
                score: point.score,
                payload: payload_to_json(&point.payload),
            })
            .collect();

        debug!(collection, hits = hits.len(), "Vector search complete");
        Ok(hits)
    }

    /// Number of points in a collection. Used by status checks.
    pub async fn count(&self, collection: &str) -> Result<u64> {
        let info = self
            .client
            .collection_info(collection)
            .await
            .context("Failed to get collection info")?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}

/// Resolve the collection for an optional namespace.
pub fn collection_for(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("orgmap_{}", ns),
        _ => NODES_COLLECTION.to_string(),
    }
}

fn point_id_string(id: qdrant_client::qdrant::PointId) -> Option<String> {
    match id.point_id_options? {
        PointIdOptions::Num(n) => Some(n.to_string()),
        PointIdOptions::Uuid(u) => Some(u),
    }
}

/// Convert a Qdrant payload into a JSON object.
fn payload_to_json(payload: &std::collections::HashMap<String, Value>) -> serde_json::Value {
    let mut map = serde_json::Map::new();

    for (key, val) in payload {
        if let Some(kind) = &val.kind {
            let json_val = match kind {
                Kind::StringValue(s) => serde_json::Value::String(s.clone()),
                Kind::DoubleValue(f) => serde_json::json!(*f),
                Kind::IntegerValue(i) => serde_json::json!(*i),
                Kind::BoolValue(b) => serde_json::Value::Bool(*b),
                _ => continue,
            };
            map.insert(key.clone(), json_val);
        }
    }

    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_map_to_prefixed_collections() {
        assert_eq!(collection_for(None), NODES_COLLECTION);
        assert_eq!(collection_for(Some("")), NODES_COLLECTION);
        assert_eq!(collection_for(Some("staging")), "orgmap_staging");
    }
}
