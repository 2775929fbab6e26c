//! Backend status command.

use anyhow::Result;
use colored::Colorize;

use orgmap_db::DbPool;
use orgmap_embedding::ollama::EmbeddingConfig;
use orgmap_embedding::qdrant::NODES_COLLECTION;
use orgmap_embedding::{OllamaClient, SimilarityStore};
use orgmap_graph::{GraphClient, GraphConfig};

pub async fn run() -> Result<()> {
    // SQLite
    match DbPool::from_env() {
        Ok(_) => println!("{} relational store", "ok  ".green()),
        Err(e) => println!("{} relational store ({})", "down".red(), e),
    }

    // Neo4j
    match GraphConfig::from_env() {
        Ok(config) => match GraphClient::connect(&config).await {
            Ok(_) => println!("{} neo4j", "ok  ".green()),
            Err(e) => println!("{} neo4j ({})", "down".red(), e),
        },
        Err(e) => println!("{} neo4j ({})", "down".red(), e),
    }

    // Ollama
    let ollama = OllamaClient::new(EmbeddingConfig::from_env());
    if ollama.health_check().await {
        println!("{} ollama", "ok  ".green());
    } else {
        println!("{} ollama (model missing or service unreachable)", "down".red());
    }

    // Qdrant
    match SimilarityStore::from_env() {
        Ok(store) => match store.count(NODES_COLLECTION).await {
            Ok(count) => println!("{} qdrant ({} vectors)", "ok  ".green(), count),
            Err(e) => println!("{} qdrant ({})", "down".red(), e),
        },
        Err(e) => println!("{} qdrant ({})", "down".red(), e),
    }

    Ok(())
}
