//! Local substring search over loaded nodes.

use std::collections::HashSet;

use serde_json::Value;

use crate::model::Node;

/// Property fields consulted by local search, besides label and type name.
pub const SEARCHABLE_PROPERTIES: &[&str] = &["code", "description", "slug", "title", "name"];

/// Case-insensitive substring match over the loaded node set.
///
/// Matches against each node's label, its type name, and the fixed
/// [`SEARCHABLE_PROPERTIES`] list. An empty query matches nothing, which
/// callers use to clear highlighting. Pure projection: the node slice is
/// never mutated.
pub fn local_matches(nodes: &[Node], query: &str) -> HashSet<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return HashSet::new();
    }

    nodes
        .iter()
        .filter(|node| matches_node(node, &needle))
        .map(|node| node.id.clone())
        .collect()
}

fn matches_node(node: &Node, needle: &str) -> bool {
    if node.label.to_lowercase().contains(needle) {
        return true;
    }
    if node.node_type.as_str().contains(needle) {
        return true;
    }
    SEARCHABLE_PROPERTIES.iter().any(|field| {
        node.properties
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    fn fixture() -> Vec<Node> {
        vec![
            Node::new("func-fin", NodeType::Function, "Finance").with_property("code", "FIN"),
            Node::new("dept-acc", NodeType::Department, "Accounting")
                .with_property("description", "Ledger upkeep and closing"),
            Node::new("job-close", NodeType::JobToBeDone, "Close the books")
                .with_property("slug", "close-the-books"),
        ]
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(local_matches(&fixture(), "").is_empty());
        assert!(local_matches(&fixture(), "   ").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let hits = local_matches(&fixture(), "fInAnCe");
        assert_eq!(hits, HashSet::from(["func-fin".to_string()]));
    }

    #[test]
    fn type_names_are_searchable() {
        let hits = local_matches(&fixture(), "department");
        assert!(hits.contains("dept-acc"));
    }

    #[test]
    fn listed_properties_are_searchable() {
        assert!(local_matches(&fixture(), "ledger").contains("dept-acc"));
        assert!(local_matches(&fixture(), "close-the").contains("job-close"));
    }

    #[test]
    fn zero_match_query_yields_empty_set() {
        assert!(local_matches(&fixture(), "quantum").is_empty());
    }
}
