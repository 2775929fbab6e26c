//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use orgmap_core::SourceError;

/// Environment variables for the Neo4j connection.
pub const NEO4J_URI_ENV: &str = "ORGMAP_NEO4J_URI";
pub const NEO4J_USER_ENV: &str = "ORGMAP_NEO4J_USER";
pub const NEO4J_PASSWORD_ENV: &str = "ORGMAP_NEO4J_PASSWORD";

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "orgmap_dev".to_string(),
        }
    }
}

impl GraphConfig {
    /// Read the connection config from the environment.
    ///
    /// URI and user fall back to local defaults; the password is required
    /// and its absence fails fast here, before any connection attempt.
    pub fn from_env() -> Result<Self, SourceError> {
        let password = std::env::var(NEO4J_PASSWORD_ENV)
            .map_err(|_| SourceError::config(format!("{} is not set", NEO4J_PASSWORD_ENV)))?;
        Ok(Self {
            uri: std::env::var(NEO4J_URI_ENV).unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: std::env::var(NEO4J_USER_ENV).unwrap_or_else(|_| "neo4j".to_string()),
            password,
        })
    }
}

/// Read-only client for the Neo4j ontology graph.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// neo4rs builds its pool lazily, so `Graph::connect` succeeds even
    /// when the server is down. A `RETURN 1` ping forces the bolt
    /// handshake immediately, turning an unreachable server into a fast
    /// failure the caller can convert to an error envelope.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db("neo4j")
            .max_connections(4)
            .fetch_size(50)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .context("Neo4j is not responding to queries")?;

        Ok(Self { graph })
    }

    /// Execute a Cypher query and collect the result rows.
    pub async fn query(&self, query: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self
            .graph
            .execute(query)
            .await
            .context("Neo4j query failed")?;

        let mut rows = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            rows.push(row);
        }
        Ok(rows)
    }
}
