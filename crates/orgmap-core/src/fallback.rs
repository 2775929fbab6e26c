//! Deterministic fallback dataset.
//!
//! Substituted by the aggregator when every backing source fails or comes
//! back empty, so the exploration surface always renders a usable graph.
//! The dataset is static: two calls produce identical output.

use crate::model::{rel, Edge, GraphPayload, Node, NodeType, ResponseMode};

/// Source name stamped on fallback envelopes.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Build the canned sample organization.
///
/// Every node type is represented and every edge's endpoints are present
/// in the node list, so the result passes the same referential checks as
/// a live adapter response.
pub fn sample_graph() -> GraphPayload {
    let nodes = vec![
        Node::new("func-finance", NodeType::Function, "Finance")
            .with_property("code", "FIN")
            .with_property("description", "Plans, controls, and reports the company's money"),
        Node::new("func-operations", NodeType::Function, "Operations")
            .with_property("code", "OPS")
            .with_property("description", "Runs the day-to-day delivery engine"),
        Node::new("dept-accounting", NodeType::Department, "Accounting")
            .with_property("code", "FIN-ACC"),
        Node::new("dept-logistics", NodeType::Department, "Logistics")
            .with_property("code", "OPS-LOG"),
        Node::new("role-controller", NodeType::Role, "Financial Controller"),
        Node::new("role-dispatcher", NodeType::Role, "Dispatch Coordinator"),
        Node::new("job-close-books", NodeType::JobToBeDone, "Close the monthly books")
            .with_property("slug", "close-the-monthly-books"),
        Node::new("job-route-orders", NodeType::JobToBeDone, "Route orders to carriers")
            .with_property("slug", "route-orders-to-carriers"),
        Node::new("vcat-efficiency", NodeType::ValueCategory, "Operational Efficiency"),
        Node::new("vdrv-cycle-time", NodeType::ValueDriver, "Reduced cycle time"),
        Node::new("vdrv-accuracy", NodeType::ValueDriver, "Reporting accuracy"),
        Node::new("agent-reconciler", NodeType::Agent, "Reconciliation Agent")
            .with_property("description", "Matches ledger entries against bank statements"),
        Node::new("persona-cfo", NodeType::Persona, "Cost-conscious CFO"),
        Node::new("wf-month-end", NodeType::Workflow, "Month-end close"),
    ];

    let edges = vec![
        Edge::new("func-finance", rel::OWNS, "dept-accounting"),
        Edge::new("func-operations", rel::OWNS, "dept-logistics"),
        Edge::new("dept-accounting", rel::HAS_ROLE, "role-controller"),
        Edge::new("dept-logistics", rel::HAS_ROLE, "role-dispatcher"),
        Edge::new("role-controller", rel::PERFORMS, "job-close-books"),
        Edge::new("role-dispatcher", rel::PERFORMS, "job-route-orders"),
        Edge::new("job-close-books", rel::DELIVERS, "vdrv-accuracy"),
        Edge::new("job-route-orders", rel::DELIVERS, "vdrv-cycle-time"),
        Edge::new("vcat-efficiency", rel::CONTAINS, "vdrv-cycle-time"),
        Edge::new("vcat-efficiency", rel::CONTAINS, "vdrv-accuracy"),
        Edge::new("agent-reconciler", rel::AUTOMATES, "job-close-books"),
        Edge::new("persona-cfo", rel::EMBODIES, "role-controller"),
        Edge::new("wf-month-end", rel::INCLUDES, "job-close-books"),
    ];

    GraphPayload::with_mode(ResponseMode::Mock, FALLBACK_SOURCE, nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_graph_is_deterministic() {
        assert_eq!(sample_graph(), sample_graph());
    }

    #[test]
    fn sample_graph_has_no_dangling_edges() {
        let payload = sample_graph();
        let ids: HashSet<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &payload.edges {
            assert!(ids.contains(edge.source.as_str()), "missing {}", edge.source);
            assert!(ids.contains(edge.target.as_str()), "missing {}", edge.target);
        }
    }

    #[test]
    fn sample_graph_covers_every_node_type() {
        let payload = sample_graph();
        let types: HashSet<_> = payload.nodes.iter().map(|n| n.node_type).collect();
        assert_eq!(types.len(), NodeType::ALL.len());
    }

    #[test]
    fn sample_graph_ids_are_unique() {
        let payload = sample_graph();
        let ids: HashSet<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), payload.nodes.len());
    }
}
