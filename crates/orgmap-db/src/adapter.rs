//! Relational graph adapter.
//!
//! Turns rows and foreign keys into a graph payload in two passes: first
//! every requested entity kind is fetched in dependency order (top-level
//! entities before their dependents) and mapped to nodes, then foreign
//! keys and association rows are mapped to edges. An edge is only emitted
//! when both endpoints made it into the node set, so association rows
//! referencing absent ids silently produce nothing, and the edge set can
//! never dangle regardless of which entity kinds were requested.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, warn};

use orgmap_core::model::{rel, Edge, GraphPayload, Node, NodeType};
use orgmap_core::source::{FetchRequest, GraphSource};

use crate::pool::{DbPool, DbResult};
use crate::queries::{agents, assoc, departments, functions, jobs, personas, roles, value, workflows};

/// Provenance name stamped on this adapter's envelopes.
pub const SOURCE_NAME: &str = "relational";

/// Read-only adapter over the organizational ontology schema.
pub struct RelationalAdapter {
    pool: DbPool,
}

impl RelationalAdapter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Construct from `ORGMAP_DB_PATH`. Fails fast on missing configuration.
    pub fn from_env() -> DbResult<Self> {
        Ok(Self::new(DbPool::from_env()?))
    }

    fn assemble(&self, request: &FetchRequest) -> GraphPayload {
        let scope = request.scope.as_deref();
        let limit = request.limit as i64;

        // Pass 1: nodes, top-level entities before dependents.
        let function_rows = if request.wants(NodeType::Function) {
            fetch_kind("business_functions", functions::list_functions(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let department_rows = if request.wants(NodeType::Department) {
            fetch_kind("departments", departments::list_departments(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let role_rows = if request.wants(NodeType::Role) {
            fetch_kind("roles", roles::list_roles(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let category_rows = if request.wants(NodeType::ValueCategory) {
            fetch_kind("value_categories", value::list_categories(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let driver_rows = if request.wants(NodeType::ValueDriver) {
            fetch_kind("value_drivers", value::list_drivers(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let job_rows = if request.wants(NodeType::JobToBeDone) {
            fetch_kind("jobs_to_be_done", jobs::list_jobs(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let agent_rows = if request.wants(NodeType::Agent) {
            fetch_kind("agents", agents::list_agents(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let persona_rows = if request.wants(NodeType::Persona) {
            fetch_kind("personas", personas::list_personas(&self.pool, scope, limit))
        } else {
            Vec::new()
        };
        let workflow_rows = if request.wants(NodeType::Workflow) {
            fetch_kind("workflows", workflows::list_workflows(&self.pool, scope, limit))
        } else {
            Vec::new()
        };

        let mut nodes: Vec<Node> = Vec::new();
        nodes.extend(function_rows.iter().map(function_node));
        nodes.extend(department_rows.iter().map(department_node));
        nodes.extend(role_rows.iter().map(role_node));
        nodes.extend(category_rows.iter().map(category_node));
        nodes.extend(driver_rows.iter().map(driver_node));
        nodes.extend(job_rows.iter().map(job_node));
        nodes.extend(agent_rows.iter().map(agent_node));
        nodes.extend(persona_rows.iter().map(persona_node));
        nodes.extend(workflow_rows.iter().map(workflow_node));

        let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        // Pass 2: edges, gated on both endpoints being present.
        let mut edges: Vec<Edge> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for row in &department_rows {
            push_edge(&present, &mut seen, &mut edges, &row.function_id, rel::OWNS, &row.id);
        }
        for row in &role_rows {
            push_edge(&present, &mut seen, &mut edges, &row.department_id, rel::HAS_ROLE, &row.id);
        }
        for row in &driver_rows {
            push_edge(&present, &mut seen, &mut edges, &row.category_id, rel::CONTAINS, &row.id);
        }
        for row in &persona_rows {
            if let Some(role_id) = &row.role_id {
                push_edge(&present, &mut seen, &mut edges, &row.id, rel::EMBODIES, role_id);
            }
        }

        for row in fetch_kind("role_jobs", assoc::list_role_jobs(&self.pool, limit)) {
            push_edge(&present, &mut seen, &mut edges, &row.owner_id, rel::PERFORMS, &row.member_id);
        }
        for row in fetch_kind("job_value_drivers", assoc::list_job_drivers(&self.pool, limit)) {
            push_edge(&present, &mut seen, &mut edges, &row.owner_id, rel::DELIVERS, &row.member_id);
        }
        for row in fetch_kind("agent_jobs", assoc::list_agent_jobs(&self.pool, limit)) {
            push_edge(&present, &mut seen, &mut edges, &row.owner_id, rel::AUTOMATES, &row.member_id);
        }
        for row in fetch_kind("workflow_jobs", assoc::list_workflow_jobs(&self.pool, limit)) {
            push_edge(&present, &mut seen, &mut edges, &row.owner_id, rel::INCLUDES, &row.member_id);
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "Assembled relational snapshot");
        GraphPayload::live(SOURCE_NAME, nodes, edges)
    }
}

#[async_trait]
impl GraphSource for RelationalAdapter {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, request: &FetchRequest) -> GraphPayload {
        self.assemble(request)
    }
}

/// Unwrap one entity kind's rows, degrading a failure to an empty set.
/// A broken table never aborts the whole adapter call.
fn fetch_kind<T>(kind: &str, result: DbResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(kind, error = %e, "Entity query failed; contributing empty set");
            Vec::new()
        }
    }
}

/// Emit an edge iff both endpoints are present; duplicates collapse by id.
fn push_edge(
    present: &HashSet<&str>,
    seen: &mut HashSet<String>,
    edges: &mut Vec<Edge>,
    source: &str,
    rel_type: &str,
    target: &str,
) {
    if !present.contains(source) || !present.contains(target) {
        return;
    }
    let edge = Edge::new(source, rel_type, target);
    if seen.insert(edge.id.clone()) {
        edges.push(edge);
    }
}

fn function_node(row: &functions::FunctionRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Function, &row.name).with_property("org", row.org.clone());
    if let Some(code) = &row.code {
        node = node.with_property("code", code.clone());
    }
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn department_node(row: &departments::DepartmentRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Department, &row.name).with_property("org", row.org.clone());
    if let Some(code) = &row.code {
        node = node.with_property("code", code.clone());
    }
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn role_node(row: &roles::RoleRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Role, &row.title).with_property("org", row.org.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn category_node(row: &value::ValueCategoryRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::ValueCategory, &row.name).with_property("org", row.org.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn driver_node(row: &value::ValueDriverRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::ValueDriver, &row.name).with_property("org", row.org.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn job_node(row: &jobs::JobRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::JobToBeDone, &row.name).with_property("org", row.org.clone());
    if let Some(slug) = &row.slug {
        node = node.with_property("slug", slug.clone());
    }
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    if let Some(category) = &row.category {
        node = node.with_property("category", category.clone());
    }
    node
}

fn agent_node(row: &agents::AgentRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Agent, &row.name)
        .with_property("org", row.org.clone())
        .with_property("status", row.status.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn persona_node(row: &personas::PersonaRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Persona, &row.name).with_property("org", row.org.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

fn workflow_node(row: &workflows::WorkflowRow) -> Node {
    let mut node = Node::new(&row.id, NodeType::Workflow, &row.name).with_property("org", row.org.clone());
    if let Some(description) = &row.description {
        node = node.with_property("description", description.clone());
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = OFF;
                 INSERT INTO business_functions (id, name, code) VALUES ('F1', 'Finance', 'FIN');
                 INSERT INTO departments (id, function_id, name) VALUES ('D1', 'F1', 'Accounting');
                 INSERT INTO roles (id, department_id, title) VALUES ('R1', 'D1', 'Controller');
                 INSERT INTO jobs_to_be_done (id, name, slug) VALUES ('J1', 'Close the books', 'close-the-books');
                 INSERT INTO role_jobs (role_id, job_id) VALUES ('R1', 'J1');
                 INSERT INTO role_jobs (role_id, job_id) VALUES ('R1', 'J1');
                 INSERT INTO role_jobs (role_id, job_id) VALUES ('R1', 'J-missing');",
            )?;
            Ok(())
        })
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn dependent_row_produces_node_and_edge() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch(
                "INSERT INTO business_functions (id, name) VALUES ('F1', 'Finance');
                 INSERT INTO departments (id, function_id, name) VALUES ('D1', 'F1', 'Accounting');",
            )?;
            Ok(())
        })
        .unwrap();

        let payload = RelationalAdapter::new(pool).fetch(&FetchRequest::all()).await;

        assert_eq!(payload.nodes.len(), 2);
        assert_eq!(payload.edges.len(), 1);
        let edge = &payload.edges[0];
        assert_eq!(edge.source, "F1");
        assert_eq!(edge.target, "D1");
        assert_eq!(edge.rel_type, rel::OWNS);
    }

    #[tokio::test]
    async fn response_never_contains_dangling_edges() {
        let payload = RelationalAdapter::new(seeded_pool()).fetch(&FetchRequest::all()).await;

        let ids: HashSet<&str> = payload.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &payload.edges {
            assert!(ids.contains(edge.source.as_str()));
            assert!(ids.contains(edge.target.as_str()));
        }
    }

    #[tokio::test]
    async fn duplicate_association_rows_collapse_to_one_edge() {
        let payload = RelationalAdapter::new(seeded_pool()).fetch(&FetchRequest::all()).await;

        let performs: Vec<_> = payload.edges.iter().filter(|e| e.rel_type == rel::PERFORMS).collect();
        assert_eq!(performs.len(), 1);
        assert_eq!(performs[0].target, "J1", "row pointing at a missing job emits nothing");
    }

    #[tokio::test]
    async fn type_filter_drops_edges_to_unrequested_kinds() {
        let payload = RelationalAdapter::new(seeded_pool())
            .fetch(&FetchRequest::all().with_types(vec![NodeType::Function, NodeType::Role]))
            .await;

        assert!(payload.nodes.iter().all(|n| {
            n.node_type == NodeType::Function || n.node_type == NodeType::Role
        }));
        // Every edge touching a department or job is gated out.
        assert!(payload.edges.is_empty());
    }

    #[tokio::test]
    async fn broken_table_degrades_to_empty_kind() {
        let pool = seeded_pool();
        pool.with_conn(|conn| {
            conn.execute_batch("DROP TABLE agents;")?;
            Ok(())
        })
        .unwrap();

        let payload = RelationalAdapter::new(pool).fetch(&FetchRequest::all()).await;

        assert!(!payload.is_error());
        assert!(payload.nodes.iter().any(|n| n.node_type == NodeType::Function));
        assert!(payload.nodes.iter().all(|n| n.node_type != NodeType::Agent));
    }

    #[tokio::test]
    async fn per_entity_limit_is_applied() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            for i in 0..10 {
                conn.execute(
                    "INSERT INTO business_functions (id, name) VALUES (?1, ?2)",
                    rusqlite::params![format!("F{}", i), format!("Function {}", i)],
                )?;
            }
            Ok(())
        })
        .unwrap();

        let mut request = FetchRequest::all();
        request.limit = 3;
        let payload = RelationalAdapter::new(pool).fetch(&request).await;
        assert_eq!(payload.nodes.len(), 3);
    }

    #[tokio::test]
    async fn scope_filter_restricts_to_one_org() {
        let pool = DbPool::in_memory().unwrap();
        pool.with_conn(|conn| {
            conn.execute_batch(
                "INSERT INTO business_functions (id, org, name) VALUES ('F1', 'acme', 'Finance');
                 INSERT INTO business_functions (id, org, name) VALUES ('F2', 'globex', 'Legal');",
            )?;
            Ok(())
        })
        .unwrap();

        let mut request = FetchRequest::all();
        request.scope = Some("acme".to_string());
        let payload = RelationalAdapter::new(pool).fetch(&request).await;

        assert_eq!(payload.nodes.len(), 1);
        assert_eq!(payload.nodes[0].id, "F1");
    }
}
