//! Native record normalization.
//!
//! Queries issued by the adapter project every node to the scalar columns
//! `id`, `labels`, `name`, `description` and every relationship to
//! `source`, `target`, `rel_type`. The `id` column is computed in Cypher
//! as `coalesce(n.id, 'n' + toString(id(n)))`: an explicit identifier
//! property wins, otherwise a stable string is synthesized from the
//! store's opaque numeric identity. Raw traversals that follow the same
//! column convention normalize identically.

use neo4rs::Row;
use serde_json::Value;

use orgmap_core::model::{Edge, Node};
use orgmap_core::typemap;

/// Cypher fragment computing the semantic id for a bound node variable.
pub fn id_projection(var: &str) -> String {
    format!("coalesce({var}.id, 'n' + toString(id({var})))")
}

/// Cypher fragment computing the display name for a bound node variable.
pub fn name_projection(var: &str) -> String {
    format!("coalesce({var}.title, {var}.name, {var}.id, toString(id({var})))")
}

/// Build a node from a projected row; `None` when the row has no usable id.
///
/// The label set maps through the closed lookup table; an unknown set
/// falls back to the documented default type.
pub fn node_from_row(row: &Row) -> Option<Node> {
    let id: String = row.get("id").ok()?;
    if id.is_empty() {
        return None;
    }

    let labels: Vec<String> = row.get("labels").unwrap_or_default();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let node_type = typemap::label_to_type(&label_refs);

    let name: String = row.get("name").unwrap_or_default();
    let name = if name.is_empty() { id.clone() } else { name };

    let mut node = Node::new(id, node_type, name);
    if let Ok(description) = row.get::<String>("description") {
        if !description.is_empty() {
            node.properties.insert("description".to_string(), Value::String(description));
        }
    }
    if !labels.is_empty() {
        node.properties.insert(
            "labels".to_string(),
            Value::Array(labels.into_iter().map(Value::String).collect()),
        );
    }
    Some(node)
}

/// Build an edge from a projected row; `None` when any column is missing.
/// The edge id is derived from the semantic endpoint ids, so the same
/// relationship seen through this adapter and the relational one collides.
pub fn edge_from_row(row: &Row) -> Option<Edge> {
    let source: String = row.get("source").ok()?;
    let target: String = row.get("target").ok()?;
    let rel_type: String = row.get("rel_type").ok()?;
    if source.is_empty() || target.is_empty() || rel_type.is_empty() {
        return None;
    }
    Some(Edge::new(source, rel_type, target))
}

/// True when a traversal produced rows but none carried the projected
/// columns. The adapter reports this as a source error instead of
/// passing off the empty set as live data.
pub fn projection_mismatch(rows: usize, nodes: usize, edges: usize) -> bool {
    rows > 0 && nodes == 0 && edges == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_without_projected_columns_are_flagged() {
        // e.g. `MATCH (n:Function) RETURN n` returns rows whose only
        // column is the node binding; nothing normalizes.
        assert!(projection_mismatch(3, 0, 0));
    }

    #[test]
    fn empty_and_normalized_results_pass() {
        assert!(!projection_mismatch(0, 0, 0));
        assert!(!projection_mismatch(3, 3, 0));
        assert!(!projection_mismatch(3, 0, 2));
    }

    #[test]
    fn id_projection_prefers_explicit_property() {
        assert_eq!(id_projection("n"), "coalesce(n.id, 'n' + toString(id(n)))");
    }
}
