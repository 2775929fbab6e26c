//! # Orgmap Embedding
//!
//! Similarity adapter: Ollama embeddings plus Qdrant vector search,
//! producing node-only payloads for semantic exploration of the ontology.

pub mod adapter;
pub mod ollama;
pub mod qdrant;

pub use adapter::SimilarityAdapter;
pub use ollama::OllamaClient;
pub use qdrant::SimilarityStore;
