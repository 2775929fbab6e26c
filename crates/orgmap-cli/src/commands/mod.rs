//! Command definitions and dispatch.

pub mod expand;
pub mod fetch;
pub mod search;
pub mod status;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use orgmap_core::model::NodeType;
use orgmap_core::source::GraphSource;
use orgmap_db::RelationalAdapter;
use orgmap_graph::NativeGraphAdapter;

/// Organizational ontology graph explorer.
#[derive(Parser)]
#[command(name = "orgmap", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and merge the graph from all configured sources
    Fetch(fetch::FetchArgs),
    /// Search loaded nodes locally, or the vector index semantically
    Search(search::SearchArgs),
    /// Expand the neighborhood around a node
    Expand(expand::ExpandArgs),
    /// Check reachability of the backing services
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Fetch(args) => fetch::run(args).await,
            Commands::Search(args) => search::run(args).await,
            Commands::Expand(args) => expand::run(args).await,
            Commands::Status => status::run().await,
        }
    }
}

/// Build every source whose configuration is present.
///
/// A source with missing config or an unreachable backend is skipped with
/// a warning; the aggregator degrades to whatever remains.
pub async fn build_sources() -> Vec<Arc<dyn GraphSource>> {
    let mut sources: Vec<Arc<dyn GraphSource>> = Vec::new();

    match RelationalAdapter::from_env() {
        Ok(adapter) => sources.push(Arc::new(adapter)),
        Err(e) => warn!(error = %e, "Skipping relational source"),
    }

    match NativeGraphAdapter::from_env().await {
        Ok(adapter) => sources.push(Arc::new(adapter)),
        Err(e) => warn!(error = %e, "Skipping graph source"),
    }

    sources
}

/// Parse a comma-separated list of node type names.
pub fn parse_types(raw: Option<&str>) -> Result<Vec<NodeType>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<NodeType>().map_err(|e| anyhow::anyhow!(e)))
        .collect()
}
