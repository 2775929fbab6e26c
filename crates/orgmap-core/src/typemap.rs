//! Node-type inference.
//!
//! Two lookups live here: the closed label table used by the native graph
//! adapter, and the ordered matcher cascade used by the similarity adapter
//! for vector-index payloads. Both fall back to [`DEFAULT_NODE_TYPE`].

use serde_json::Value;

use crate::model::NodeType;

/// The single fallback type applied when no heuristic matches.
///
/// Functions are the top of the organizational hierarchy, so an
/// unclassifiable record degrades to the broadest category instead of
/// being dropped.
pub const DEFAULT_NODE_TYPE: NodeType = NodeType::Function;

/// Map a native graph label set to a node type.
///
/// The first label with a known mapping wins; an unknown label set yields
/// [`DEFAULT_NODE_TYPE`].
pub fn label_to_type(labels: &[&str]) -> NodeType {
    labels
        .iter()
        .find_map(|label| match *label {
            "Function" | "BusinessFunction" => Some(NodeType::Function),
            "Department" => Some(NodeType::Department),
            "Role" => Some(NodeType::Role),
            "JobToBeDone" | "Job" => Some(NodeType::JobToBeDone),
            "ValueCategory" => Some(NodeType::ValueCategory),
            "ValueDriver" => Some(NodeType::ValueDriver),
            "Agent" => Some(NodeType::Agent),
            "Persona" => Some(NodeType::Persona),
            "Workflow" => Some(NodeType::Workflow),
            _ => None,
        })
        .unwrap_or(DEFAULT_NODE_TYPE)
}

/// Canonical native graph label for a node type. Inverse of
/// [`label_to_type`] for the canonical spelling of each label.
pub fn type_to_label(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Function => "Function",
        NodeType::Department => "Department",
        NodeType::Role => "Role",
        NodeType::JobToBeDone => "JobToBeDone",
        NodeType::ValueCategory => "ValueCategory",
        NodeType::ValueDriver => "ValueDriver",
        NodeType::Agent => "Agent",
        NodeType::Persona => "Persona",
        NodeType::Workflow => "Workflow",
    }
}

/// One inference heuristic over a vector-index payload and its id.
type TypeMatcher = fn(&Value, &str) -> Option<NodeType>;

/// Ordered heuristic cascade. Evaluated in sequence, first success wins;
/// new heuristics slot in without touching the existing ones.
const MATCHERS: &[TypeMatcher] = &[explicit_type_field, category_lookup, id_prefix];

/// Infer the node type for a similarity hit.
pub fn infer_node_type(payload: &Value, id: &str) -> NodeType {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(payload, id))
        .unwrap_or(DEFAULT_NODE_TYPE)
}

/// Heuristic 1: an explicit `node_type` (or legacy `type`) payload field.
fn explicit_type_field(payload: &Value, _id: &str) -> Option<NodeType> {
    payload
        .get("node_type")
        .or_else(|| payload.get("type"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Heuristic 2: the indexing pipeline's `category` field.
fn category_lookup(payload: &Value, _id: &str) -> Option<NodeType> {
    let category = payload.get("category").and_then(Value::as_str)?;
    match category {
        "functions" | "org_functions" => Some(NodeType::Function),
        "departments" => Some(NodeType::Department),
        "roles" => Some(NodeType::Role),
        "jobs" | "jobs_to_be_done" => Some(NodeType::JobToBeDone),
        "value_categories" => Some(NodeType::ValueCategory),
        "value_drivers" | "value" => Some(NodeType::ValueDriver),
        "agents" => Some(NodeType::Agent),
        "personas" => Some(NodeType::Persona),
        "workflows" => Some(NodeType::Workflow),
        _ => None,
    }
}

/// Heuristic 3: conventional id prefixes from the relational schema.
fn id_prefix(_payload: &Value, id: &str) -> Option<NodeType> {
    const PREFIXES: &[(&str, NodeType)] = &[
        ("func-", NodeType::Function),
        ("dept-", NodeType::Department),
        ("role-", NodeType::Role),
        ("job-", NodeType::JobToBeDone),
        ("vcat-", NodeType::ValueCategory),
        ("vdrv-", NodeType::ValueDriver),
        ("agent-", NodeType::Agent),
        ("persona-", NodeType::Persona),
        ("wf-", NodeType::Workflow),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| id.starts_with(prefix))
        .map(|(_, t)| *t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_field_wins_over_everything() {
        let payload = json!({"node_type": "agent", "category": "roles"});
        assert_eq!(infer_node_type(&payload, "role-7"), NodeType::Agent);
    }

    #[test]
    fn category_beats_id_prefix() {
        let payload = json!({"category": "workflows"});
        assert_eq!(infer_node_type(&payload, "dept-3"), NodeType::Workflow);
    }

    #[test]
    fn id_prefix_applies_when_payload_is_silent() {
        let payload = json!({"content": "quarterly close"});
        assert_eq!(infer_node_type(&payload, "vdrv-12"), NodeType::ValueDriver);
    }

    #[test]
    fn unmatched_falls_back_to_default() {
        let payload = json!({"content": "misc"});
        assert_eq!(infer_node_type(&payload, "opaque-id"), DEFAULT_NODE_TYPE);
    }

    #[test]
    fn label_mapping_round_trips() {
        for t in NodeType::ALL {
            assert_eq!(label_to_type(&[type_to_label(t)]), t);
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_default() {
        assert_eq!(label_to_type(&["Gizmo", "Widget"]), DEFAULT_NODE_TYPE);
        assert_eq!(label_to_type(&["Gizmo", "Persona"]), NodeType::Persona);
    }
}
