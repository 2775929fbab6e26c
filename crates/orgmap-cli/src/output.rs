//! Terminal output formatting.

use std::collections::BTreeMap;

use colored::Colorize;
use orgmap_core::model::{GraphPayload, Node, ResponseMode};

/// Print envelope provenance and per-type node counts.
pub fn print_summary(payload: &GraphPayload) {
    let mode = match payload.meta.mode {
        ResponseMode::Live => "live".green(),
        ResponseMode::Mock => "mock".yellow(),
        ResponseMode::Semantic => "semantic".cyan(),
        ResponseMode::Error => "error".red(),
    };

    println!(
        "{} {} {} ({} nodes, {} edges)",
        "Source".bold(),
        payload.meta.source.cyan(),
        mode,
        payload.meta.total_nodes,
        payload.meta.total_edges
    );
    if let Some(error) = &payload.meta.error {
        println!("{}: {}", "Error".red().bold(), error);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &payload.nodes {
        *counts.entry(node.node_type.as_str()).or_default() += 1;
    }
    for (node_type, count) in counts {
        println!("  {:<16} {}", node_type.dimmed(), count);
    }
}

/// Print nodes as a table.
pub fn print_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) {
    let nodes: Vec<&Node> = nodes.into_iter().collect();
    if nodes.is_empty() {
        println!("{}", "No nodes.".dimmed());
        return;
    }

    println!("{:<28} {:<16} {:<40}", "ID", "Type", "Label");
    println!("{}", "-".repeat(86));
    for node in nodes {
        println!(
            "{:<28} {:<16} {:<40}",
            truncate(&node.id, 26),
            node.node_type.as_str(),
            truncate(&node.label, 38)
        );
    }
}

/// Truncate a string for table display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
