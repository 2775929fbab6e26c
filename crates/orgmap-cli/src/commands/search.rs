//! Substring and semantic search commands.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use orgmap_core::source::{FetchRequest, SemanticRequest};
use orgmap_core::{Aggregator, GraphSession};
use orgmap_embedding::SimilarityAdapter;

use crate::commands::{build_sources, parse_types};
use crate::output;

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Search the vector index instead of substring matching
    #[arg(long)]
    pub semantic: bool,

    /// Maximum number of semantic matches
    #[arg(long, default_value_t = 10)]
    pub top_k: u64,

    /// Minimum similarity score for semantic matches
    #[arg(long, default_value_t = 0.35)]
    pub min_score: f32,

    /// Comma-separated node types to restrict semantic matches to
    #[arg(long)]
    pub types: Option<String>,

    /// Vector index namespace
    #[arg(long)]
    pub namespace: Option<String>,
}

pub async fn run(args: SearchArgs) -> Result<()> {
    // Load the graph first; search highlights within the loaded set.
    let aggregator = Aggregator::new(build_sources().await);
    let payload = aggregator.fetch(&FetchRequest::all()).await;

    let mut session = GraphSession::new();
    session.apply_fetch(payload);

    if args.semantic {
        let adapter = SimilarityAdapter::from_env()?;
        let mut request = SemanticRequest::new(&args.query);
        request.top_k = args.top_k;
        request.min_score = args.min_score;
        request.types = parse_types(args.types.as_deref())?;
        request.namespace = args.namespace;

        let outcome = session.search_semantic(&adapter, &request).await;
        if outcome.fell_back {
            println!("{}", "Semantic search unavailable; matched locally instead.".yellow());
        }
        if outcome.added > 0 {
            println!("Added {} new node(s) from the index.", outcome.added);
        }
    } else {
        session.search_local(&args.query);
    }

    let snapshot = session.snapshot();
    let highlighted = session.highlighted_ids();
    let matches: Vec<_> = snapshot
        .nodes
        .iter()
        .filter(|n| highlighted.contains(n.id.as_str()))
        .collect();

    println!("{} match(es) for {}", matches.len(), args.query.cyan());
    output::print_nodes(matches.into_iter());
    Ok(())
}
