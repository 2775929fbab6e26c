//! Neighborhood expansion command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use orgmap_core::source::FetchRequest;
use orgmap_core::{Aggregator, GraphSession};

use crate::commands::build_sources;
use crate::output;

#[derive(Args)]
pub struct ExpandArgs {
    /// Node id to expand around
    pub node_id: String,

    /// Maximum number of hops
    #[arg(long, default_value_t = 2)]
    pub hops: u32,
}

pub async fn run(args: ExpandArgs) -> Result<()> {
    let aggregator = Aggregator::new(build_sources().await);
    let payload = aggregator.fetch(&FetchRequest::all()).await;

    let mut session = GraphSession::new();
    session.apply_fetch(payload);

    let reachable = session.expand_neighbors(&args.node_id, args.hops);

    println!(
        "{} node(s) within {} hop(s) of {}",
        reachable.len(),
        args.hops,
        args.node_id.cyan()
    );

    let snapshot = session.snapshot();
    let neighborhood: Vec<_> = snapshot
        .nodes
        .iter()
        .filter(|n| reachable.contains(&n.id))
        .collect();
    output::print_nodes(neighborhood.into_iter());

    if !snapshot.contains_node(&args.node_id) {
        println!("{}", "Note: node id is not present in the loaded graph.".yellow());
    }
    Ok(())
}
