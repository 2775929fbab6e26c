//! Session-scoped graph state.
//!
//! One `GraphSession` owns the state for one exploration surface: the
//! current snapshot, active filters, search query, and selection sets.
//! Every mutation installs a freshly built immutable snapshot, so readers
//! holding an `Arc<GraphSnapshot>` always see a consistent view and no
//! global mutable state exists.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::expand;
use crate::model::{Edge, GraphMeta, GraphPayload, Node, NodeType};
use crate::search;
use crate::source::{SemanticRequest, SemanticSource};

/// Immutable node/edge collections produced by one fetch or merge.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Envelope metadata of the fetch that produced this snapshot.
    pub meta: Option<GraphMeta>,
}

impl GraphSnapshot {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Outcome of a semantic search applied to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticOutcome {
    /// Nodes unioned into the snapshot because they were not yet loaded.
    pub added: usize,
    /// Ids highlighted after the search.
    pub highlighted: usize,
    /// True when the remote source failed and local search was used instead.
    pub fell_back: bool,
}

/// Per-surface exploration state. Not shared between callers; each surface
/// constructs its own session and passes it into every operation.
#[derive(Debug, Default)]
pub struct GraphSession {
    snapshot: Arc<GraphSnapshot>,
    type_filter: HashSet<NodeType>,
    search_query: String,
    selected: HashSet<String>,
    highlighted: HashSet<String>,
    hovered: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl GraphSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheap handle to the current snapshot for concurrent readers.
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Mark a fetch in flight. There is no cancellation: if two fetches
    /// overlap, whichever `apply_fetch` lands last wins.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Install the result of a fetch, replacing the snapshot wholesale.
    ///
    /// Error envelopes keep the previous snapshot and surface their message
    /// through [`GraphSession::error`]; the surface degrades, it never
    /// goes blank. Selection sets are left as-is: ids that no longer
    /// resolve are simply absent from every view.
    pub fn apply_fetch(&mut self, payload: GraphPayload) {
        self.loading = false;
        if payload.is_error() {
            self.error = payload.meta.error.clone();
            debug!(source = payload.meta.source.as_str(), "Fetch failed; snapshot kept");
            return;
        }
        self.error = None;
        self.snapshot = Arc::new(GraphSnapshot {
            nodes: payload.nodes,
            edges: payload.edges,
            meta: Some(payload.meta),
        });
    }

    /// Union nodes additively: ids already loaded are skipped, never
    /// replaced. Returns how many nodes were actually added.
    pub fn union_nodes(&mut self, nodes: Vec<Node>) -> usize {
        let mut next = (*self.snapshot).clone();
        let existing: HashSet<String> = next.nodes.iter().map(|n| n.id.clone()).collect();
        let mut added = 0;
        for node in nodes {
            if !existing.contains(&node.id) {
                next.nodes.push(node);
                added += 1;
            }
        }
        if added > 0 {
            self.snapshot = Arc::new(next);
        }
        added
    }

    // ---- filters and projections ------------------------------------------

    /// Restrict visible nodes to the given types. Empty clears the filter.
    pub fn set_type_filter(&mut self, types: impl IntoIterator<Item = NodeType>) {
        self.type_filter = types.into_iter().collect();
    }

    /// Nodes passing the active type filter. Pure projection.
    pub fn visible_nodes(&self) -> Vec<&Node> {
        self.snapshot
            .nodes
            .iter()
            .filter(|n| self.type_filter.is_empty() || self.type_filter.contains(&n.node_type))
            .collect()
    }

    /// Edges whose endpoints are both currently visible.
    pub fn visible_edges(&self) -> Vec<&Edge> {
        let visible: HashSet<&str> = self.visible_nodes().iter().map(|n| n.id.as_str()).collect();
        self.snapshot
            .edges
            .iter()
            .filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
            .collect()
    }

    // ---- selection --------------------------------------------------------

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = HashSet::from([id.into()]);
    }

    pub fn hover(&mut self, id: Option<String>) {
        self.hovered = id;
    }

    /// Selected ids intersected with the loaded node set; stale ids from a
    /// replaced snapshot drop out silently.
    pub fn selected_ids(&self) -> HashSet<&str> {
        let loaded = self.snapshot.node_ids();
        self.selected
            .iter()
            .map(String::as_str)
            .filter(|id| loaded.contains(id))
            .collect()
    }

    /// Highlighted ids intersected with the loaded node set.
    pub fn highlighted_ids(&self) -> HashSet<&str> {
        let loaded = self.snapshot.node_ids();
        self.highlighted
            .iter()
            .map(String::as_str)
            .filter(|id| loaded.contains(id))
            .collect()
    }

    pub fn hovered_id(&self) -> Option<&str> {
        let id = self.hovered.as_deref()?;
        self.snapshot.contains_node(id).then_some(id)
    }

    // ---- search -----------------------------------------------------------

    /// Local substring search; the match set becomes the highlighted set.
    /// An empty query clears highlighting. Node/edge collections are
    /// untouched.
    pub fn search_local(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.highlighted = search::local_matches(&self.snapshot.nodes, query);
    }

    /// Remote semantic search through a similarity source.
    ///
    /// Hits already loaded are highlighted in place; genuinely new nodes
    /// are unioned additively and then highlighted. If the source fails,
    /// falls back to local substring search over the unchanged loaded set.
    pub async fn search_semantic(
        &mut self,
        source: &dyn SemanticSource,
        request: &SemanticRequest,
    ) -> SemanticOutcome {
        let payload = source.search(request).await;
        self.search_query = request.query_text.clone();

        if payload.is_error() {
            debug!(
                source = payload.meta.source.as_str(),
                "Semantic search failed; falling back to local search"
            );
            self.highlighted = search::local_matches(&self.snapshot.nodes, &request.query_text);
            return SemanticOutcome {
                added: 0,
                highlighted: self.highlighted.len(),
                fell_back: true,
            };
        }

        let hit_ids: HashSet<String> = payload.nodes.iter().map(|n| n.id.clone()).collect();
        let fresh: Vec<Node> = {
            let loaded = self.snapshot.node_ids();
            payload
                .nodes
                .into_iter()
                .filter(|n| !loaded.contains(n.id.as_str()))
                .collect()
        };
        let added = self.union_nodes(fresh);
        self.highlighted = hit_ids;

        SemanticOutcome {
            added,
            highlighted: self.highlighted_ids().len(),
            fell_back: false,
        }
    }

    // ---- neighbor expansion ----------------------------------------------

    /// Ego network around `start` over the loaded edge set. The reachable
    /// set replaces the highlighted set and `start` becomes the selection.
    pub fn expand_neighbors(&mut self, start: &str, max_hops: u32) -> HashSet<String> {
        let reachable = expand::ego_network(&self.snapshot.edges, start, max_hops);
        self.highlighted = reachable.clone();
        self.selected = HashSet::from([start.to_string()]);
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{rel, GraphPayload};
    use crate::source::SemanticRequest;
    use async_trait::async_trait;

    fn loaded_session() -> GraphSession {
        let mut session = GraphSession::new();
        session.apply_fetch(GraphPayload::live(
            "relational",
            vec![
                Node::new("func-1", NodeType::Function, "Finance"),
                Node::new("dept-1", NodeType::Department, "Accounting"),
                Node::new("role-1", NodeType::Role, "Controller"),
            ],
            vec![
                Edge::new("func-1", rel::OWNS, "dept-1"),
                Edge::new("dept-1", rel::HAS_ROLE, "role-1"),
            ],
        ));
        session
    }

    struct StubSemantic {
        payload: GraphPayload,
    }

    #[async_trait]
    impl SemanticSource for StubSemantic {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn search(&self, _request: &SemanticRequest) -> GraphPayload {
            self.payload.clone()
        }
    }

    #[test]
    fn type_filter_hides_edges_with_hidden_endpoints() {
        let mut session = loaded_session();
        session.set_type_filter([NodeType::Function, NodeType::Department]);
        assert_eq!(session.visible_nodes().len(), 2);
        let edges = session.visible_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].rel_type, rel::OWNS);
    }

    #[test]
    fn stale_selection_is_absent_after_replacement() {
        let mut session = loaded_session();
        session.select("role-1");
        session.hover(Some("dept-1".to_string()));
        session.apply_fetch(GraphPayload::live(
            "relational",
            vec![Node::new("func-9", NodeType::Function, "Legal")],
            vec![],
        ));
        assert!(session.selected_ids().is_empty());
        assert!(session.hovered_id().is_none());
    }

    #[test]
    fn error_fetch_keeps_snapshot_and_surfaces_message() {
        let mut session = loaded_session();
        session.begin_fetch();
        session.apply_fetch(GraphPayload::error("neo4j", "timeout"));
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("timeout"));
        assert_eq!(session.snapshot().nodes.len(), 3, "previous graph still usable");
    }

    #[test]
    fn local_search_clears_on_empty_query() {
        let mut session = loaded_session();
        session.search_local("finance");
        assert_eq!(session.highlighted_ids().len(), 1);
        let before = session.snapshot();
        session.search_local("");
        assert!(session.highlighted_ids().is_empty());
        assert_eq!(before.nodes.len(), session.snapshot().nodes.len());
    }

    #[test]
    fn expand_sets_highlight_and_selection() {
        let mut session = loaded_session();
        let reachable = session.expand_neighbors("func-1", 1);
        assert_eq!(reachable.len(), 2);
        assert_eq!(session.selected_ids(), HashSet::from(["func-1"]));
        assert_eq!(session.highlighted_ids().len(), 2);
    }

    #[tokio::test]
    async fn semantic_hits_highlight_existing_and_union_new() {
        let mut session = loaded_session();
        let source = StubSemantic {
            payload: GraphPayload::with_mode(
                crate::model::ResponseMode::Semantic,
                "qdrant",
                vec![
                    Node::new("func-1", NodeType::Function, "Finance"),
                    Node::new("dept-1", NodeType::Department, "Accounting"),
                    Node::new("wf-7", NodeType::Workflow, "Quarter close"),
                ],
                vec![],
            ),
        };

        let outcome = session
            .search_semantic(&source, &SemanticRequest::new("closing the quarter"))
            .await;

        assert_eq!(outcome.added, 1, "only the genuinely new node is unioned");
        assert!(!outcome.fell_back);
        assert_eq!(session.snapshot().nodes.len(), 4, "no duplicates for existing hits");
        let highlighted = session.highlighted_ids();
        assert!(highlighted.contains("func-1"));
        assert!(highlighted.contains("dept-1"));
        assert!(highlighted.contains("wf-7"));
    }

    #[tokio::test]
    async fn semantic_failure_falls_back_to_local_search() {
        let mut session = loaded_session();
        let source = StubSemantic {
            payload: GraphPayload::error("qdrant", "index offline"),
        };

        let outcome = session
            .search_semantic(&source, &SemanticRequest::new("accounting"))
            .await;

        assert!(outcome.fell_back);
        assert_eq!(outcome.added, 0);
        assert_eq!(session.snapshot().nodes.len(), 3, "loaded set unchanged");
        assert!(session.highlighted_ids().contains("dept-1"));
    }
}
