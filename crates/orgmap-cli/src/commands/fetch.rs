//! Aggregate fetch command.

use anyhow::Result;
use clap::Args;

use orgmap_core::source::{FetchRequest, DEFAULT_LIMIT};
use orgmap_core::Aggregator;

use crate::commands::{build_sources, parse_types};
use crate::output;

#[derive(Args)]
pub struct FetchArgs {
    /// Comma-separated node types (e.g. "function,role"); all when omitted
    #[arg(long)]
    pub types: Option<String>,

    /// Restrict to one organization
    #[arg(long)]
    pub scope: Option<String>,

    /// Per-entity-kind result limit
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Raw read-only Cypher traversal for the graph source
    #[arg(long)]
    pub cypher: Option<String>,
}

pub async fn run(args: FetchArgs) -> Result<()> {
    let request = FetchRequest {
        types: parse_types(args.types.as_deref())?,
        scope: args.scope,
        focus_node_id: None,
        raw_query: args.cypher,
        limit: args.limit,
    };

    let aggregator = Aggregator::new(build_sources().await);
    let payload = aggregator.fetch(&request).await;

    output::print_summary(&payload);
    println!();
    output::print_nodes(&payload.nodes);
    Ok(())
}
